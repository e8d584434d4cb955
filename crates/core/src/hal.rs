//! `embedded-hal` blocking delay and timer implementations.

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    timer::{CountDown, Periodic},
};
use void::Void;

use crate::{
    chrono::Chrono,
    clock::Clock,
    engine::{Tick, TimeUnit},
    time::Microseconds,
};

macro_rules! impl_delay {
    ($($ty:ty),*) => {
        $(
            impl<'a, T: Tick> DelayUs<$ty> for Clock<'a, T> {
                fn delay_us(&mut self, us: $ty) {
                    self.delay(TimeUnit::Micros, u64::from(us));
                }
            }

            impl<'a, T: Tick> DelayMs<$ty> for Clock<'a, T> {
                fn delay_ms(&mut self, ms: $ty) {
                    self.delay(TimeUnit::Millis, u64::from(ms));
                }
            }
        )*
    };
}

impl_delay!(u8, u16, u32);

/// A periodic count down timer driven by a [`Clock`].
///
/// ```
/// use tickchrono_core::{time::{CountDown, Microseconds}, Clock, TickSource};
/// use core::sync::atomic::{AtomicU32, Ordering};
///
/// let counter = AtomicU32::new(0);
/// let mut clock = Clock::new();
/// clock.init(u32::MAX, 1_000, TickSource::variable(&counter)).unwrap();
///
/// let mut timer = clock.countdown();
/// timer.start(Microseconds(50));
/// assert!(timer.wait().is_err());
///
/// counter.store(50, Ordering::Relaxed);
/// assert!(timer.wait().is_ok());
/// ```
#[derive(Debug)]
pub struct Countdown<'c, 'a, T: Tick> {
    clock: &'c Clock<'a, T>,
    chrono: Chrono<T>,
}

impl<'c, 'a, T: Tick> Countdown<'c, 'a, T> {
    /// Creates a stopped count down timer.
    pub fn new(clock: &'c Clock<'a, T>) -> Self {
        Self {
            clock,
            chrono: Chrono::new(),
        }
    }

    /// Returns `true` if the timer has been started.
    pub fn is_running(&self) -> bool {
        self.chrono.is_running()
    }

    /// Stops the timer.
    pub fn cancel(&mut self) {
        self.chrono.stop();
    }
}

impl<'a, T: Tick> Clock<'a, T> {
    /// Creates a count down timer on top of this clock.
    pub fn countdown(&self) -> Countdown<'_, 'a, T> {
        Countdown::new(self)
    }
}

impl<'c, 'a, T: Tick> CountDown for Countdown<'c, 'a, T> {
    type Time = Microseconds;

    fn start<I>(&mut self, count: I)
    where
        I: Into<Self::Time>,
    {
        let count = count.into();
        match self.clock.to_ticks(TimeUnit::Micros, u64::from(count.0)) {
            Some(ticks) => self.chrono.start_timeout_ticks(self.clock, ticks),
            None => log::warn!(
                "Unable to start countdown of {}: microseconds are not available",
                count
            ),
        }
    }

    /// Returns `WouldBlock` until the timeout expires, then restarts the count down.
    ///
    /// A timer that has not been started never blocks.
    fn wait(&mut self) -> nb::Result<(), Void> {
        if !self.chrono.is_running() {
            return Ok(());
        }
        if !self.chrono.is_timeout(self.clock) {
            return Err(nb::Error::WouldBlock);
        }

        let timeout = self.chrono.timeout_ticks();
        self.chrono.start_timeout_ticks(self.clock, timeout);
        Ok(())
    }
}

impl<'c, 'a, T: Tick> Periodic for Countdown<'c, 'a, T> {}
