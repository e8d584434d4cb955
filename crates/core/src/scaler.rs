//! Runtime scaling helpers for a super loop.
//!
//! [`RunEvery`] runs a piece of code at a regular interval, [`RunOnce`] runs it a single time
//! until it is reset.
//!
//! ```
//! use tickchrono_core::{scaler::RunEvery, Clock, TickSource, TimeUnit};
//! use core::sync::atomic::{AtomicU32, Ordering};
//!
//! let counter = AtomicU32::new(0);
//! let mut clock = Clock::new();
//! clock.init(u32::MAX, 1_000_000, TickSource::variable(&counter)).unwrap();
//!
//! let mut blink = RunEvery::new(500, TimeUnit::Millis);
//! assert_eq!(blink.poll(&clock), None);
//!
//! counter.store(500, Ordering::Relaxed);
//! assert_eq!(blink.poll(&clock), Some(500));
//! ```

use crate::{
    chrono::Chrono,
    clock::Clock,
    engine::{Tick, TimeUnit},
};

/// Fires once until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOnce {
    armed: bool,
}

impl Default for RunOnce {
    fn default() -> Self {
        Self::new()
    }
}

impl RunOnce {
    /// Creates an armed instance.
    pub const fn new() -> Self {
        Self { armed: true }
    }

    /// Arms the instance again.
    pub fn reset(&mut self) {
        self.armed = true;
    }

    /// Returns `true` if the next [`RunOnce::run`] call will execute its closure.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Runs `f` if the instance is armed, then disarms it.
    pub fn run<R>(&mut self, f: impl FnOnce() -> R) -> Option<R> {
        if !self.armed {
            return None;
        }

        self.armed = false;
        Some(f())
    }
}

/// Fires at a regular interval.
///
/// By default the first poll only arms the inner timer and the first firing happens one
/// interval later. In the forced mode the first poll fires immediately.
///
/// The next interval is measured from the moment the previous one fired, so a late poll
/// delays all subsequent firings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunEvery<T> {
    chrono: Chrono<T>,
    interval: T,
    unit: TimeUnit,
    forced: bool,
}

impl<T: Tick> RunEvery<T> {
    /// Creates an instance that fires once the first interval passes.
    pub const fn new(interval: T, unit: TimeUnit) -> Self {
        Self {
            chrono: Chrono::new(),
            interval,
            unit,
            forced: false,
        }
    }

    /// Creates an instance that fires on the first poll.
    pub const fn forced(interval: T, unit: TimeUnit) -> Self {
        Self {
            chrono: Chrono::new(),
            interval,
            unit,
            forced: true,
        }
    }

    /// Returns the configured interval.
    pub fn interval(&self) -> T {
        self.interval
    }

    /// Returns the unit of the interval.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Checks the interval.
    ///
    /// Returns the time elapsed since the previous firing (or since the arming) if the interval
    /// has passed, otherwise `None`. A zero interval never fires.
    pub fn poll(&mut self, clock: &Clock<'_, T>) -> Option<T> {
        if !self.chrono.is_running() {
            let timeout = if self.forced { T::ZERO } else { self.interval };
            self.chrono.start_timeout(clock, self.unit, timeout);
        }

        if self.interval == T::ZERO || !self.chrono.is_timeout(clock) {
            return None;
        }

        let elapsed = self.chrono.elapsed(clock, self.unit);
        self.chrono.start_timeout(clock, self.unit, self.interval);
        Some(elapsed)
    }

    /// Runs `f` with the elapsed time each time the interval passes.
    pub fn run<R>(&mut self, clock: &Clock<'_, T>, f: impl FnOnce(T) -> R) -> Option<R> {
        self.poll(clock).map(f)
    }

    /// Stops the inner timer, the next poll arms it again.
    pub fn reset(&mut self) {
        self.chrono.stop();
    }
}
