//! Timer objects measuring elapsed time, timeouts and intervals.

use crate::{
    clock::Clock,
    engine::{Tick, TimeUnit},
};

/// A timer object.
///
/// The chrono itself holds no reference to the clock, every operation takes the clock as an
/// argument. Since the chrono is a plain `Copy` value and [`Chrono::new`] is a `const fn`,
/// timers can be placed in statics or embedded into other structures.
///
/// ```
/// use tickchrono_core::{Chrono, Clock, TickSource};
/// use core::sync::atomic::{AtomicU32, Ordering};
///
/// let counter = AtomicU32::new(0);
/// let mut clock = Clock::new();
/// clock.init(u32::MAX, 1_000_000, TickSource::variable(&counter)).unwrap();
///
/// let mut chrono = Chrono::new();
/// chrono.start_timeout_ms(&clock, 10);
/// counter.store(10, Ordering::Relaxed);
/// assert!(chrono.is_timeout(&clock));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrono<T> {
    running: bool,
    start_tick: T,
    timeout: T,
    timed_out: bool,
}

impl<T: Tick> Default for Chrono<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tick> Chrono<T> {
    /// Creates a stopped timer.
    pub const fn new() -> Self {
        Self {
            running: false,
            start_tick: T::ZERO,
            timeout: T::ZERO,
            timed_out: false,
        }
    }

    /// Returns `true` if the timer is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the tick captured by the last start.
    pub fn start_tick(&self) -> T {
        self.start_tick
    }

    /// Returns the timeout in ticks.
    pub fn timeout_ticks(&self) -> T {
        self.timeout
    }

    /// Starts the time measurement.
    ///
    /// Does nothing if the clock is not initialized.
    pub fn start(&mut self, clock: &Clock<'_, T>) {
        if let Some(now) = clock.now() {
            self.start_tick = now;
            self.running = true;
        }
    }

    /// Stops the time measurement and clears the timeout flag.
    pub fn stop(&mut self) {
        self.running = false;
        self.timed_out = false;
    }

    /// Starts the time measurement with a timeout in seconds.
    pub fn start_timeout_s(&mut self, clock: &Clock<'_, T>, timeout: T) {
        self.start_timeout(clock, TimeUnit::Seconds, timeout);
    }

    /// Starts the time measurement with a timeout in milliseconds.
    pub fn start_timeout_ms(&mut self, clock: &Clock<'_, T>, timeout: T) {
        self.start_timeout(clock, TimeUnit::Millis, timeout);
    }

    /// Starts the time measurement with a timeout in microseconds.
    pub fn start_timeout_us(&mut self, clock: &Clock<'_, T>, timeout: T) {
        self.start_timeout(clock, TimeUnit::Micros, timeout);
    }

    /// Starts the time measurement with a timeout in the given unit.
    ///
    /// Does nothing if the unit is not available. A timeout longer than one counter period
    /// saturates at `top - 1` ticks, the longest elapsed time a single period can show.
    pub fn start_timeout(&mut self, clock: &Clock<'_, T>, unit: TimeUnit, timeout: T) {
        if let Some(timeout) = clock.to_ticks(unit, timeout.into_u64()) {
            self.start_timeout_ticks(clock, timeout);
        }
    }

    /// Starts the time measurement with a timeout in raw ticks.
    pub fn start_timeout_ticks(&mut self, clock: &Clock<'_, T>, timeout: T) {
        self.timeout = timeout;
        self.timed_out = false;
        self.start(clock);
    }

    /// Returns the number of ticks since the start, zero if the timer is stopped.
    pub fn elapsed_ticks(&self, clock: &Clock<'_, T>) -> T {
        if !self.running {
            return T::ZERO;
        }

        match clock.now() {
            Some(now) => clock.elapsed_between(now, self.start_tick),
            None => T::ZERO,
        }
    }

    /// Returns the time in seconds since the start.
    pub fn elapsed_s(&self, clock: &Clock<'_, T>) -> T {
        self.elapsed(clock, TimeUnit::Seconds)
    }

    /// Returns the time in milliseconds since the start.
    pub fn elapsed_ms(&self, clock: &Clock<'_, T>) -> T {
        self.elapsed(clock, TimeUnit::Millis)
    }

    /// Returns the time in microseconds since the start.
    pub fn elapsed_us(&self, clock: &Clock<'_, T>) -> T {
        self.elapsed(clock, TimeUnit::Micros)
    }

    /// Returns the time in the given unit since the start, zero if the timer is stopped.
    pub fn elapsed(&self, clock: &Clock<'_, T>, unit: TimeUnit) -> T {
        clock.ticks_to(unit, self.elapsed_ticks(clock))
    }

    /// Returns the time in seconds left until the timeout.
    pub fn left_s(&mut self, clock: &Clock<'_, T>) -> T {
        self.left(clock, TimeUnit::Seconds)
    }

    /// Returns the time in milliseconds left until the timeout.
    pub fn left_ms(&mut self, clock: &Clock<'_, T>) -> T {
        self.left(clock, TimeUnit::Millis)
    }

    /// Returns the time in microseconds left until the timeout.
    pub fn left_us(&mut self, clock: &Clock<'_, T>) -> T {
        self.left(clock, TimeUnit::Micros)
    }

    /// Returns the time in the given unit left until the timeout.
    ///
    /// Once the timeout is reached the timer stays timed out and this method returns zero
    /// until the timer is restarted.
    pub fn left(&mut self, clock: &Clock<'_, T>, unit: TimeUnit) -> T {
        if !self.running || self.timed_out {
            return T::ZERO;
        }

        let elapsed = self.elapsed_ticks(clock);
        if self.latch(elapsed) {
            return T::ZERO;
        }
        clock.ticks_to(unit, self.timeout.wrapping_sub(elapsed))
    }

    /// Returns `true` if the timeout has been reached.
    ///
    /// The result is latched: once `true`, it stays `true` until the timer is restarted or
    /// stopped.
    pub fn is_timeout(&mut self, clock: &Clock<'_, T>) -> bool {
        if !self.running {
            return false;
        }
        if self.timed_out {
            return true;
        }

        let elapsed = self.elapsed_ticks(clock);
        self.latch(elapsed)
    }

    /// Returns the time in seconds since the previous call and restarts the measurement.
    pub fn interval_s(&mut self, clock: &Clock<'_, T>) -> T {
        self.interval(clock, TimeUnit::Seconds)
    }

    /// Returns the time in milliseconds since the previous call and restarts the measurement.
    pub fn interval_ms(&mut self, clock: &Clock<'_, T>) -> T {
        self.interval(clock, TimeUnit::Millis)
    }

    /// Returns the time in microseconds since the previous call and restarts the measurement.
    pub fn interval_us(&mut self, clock: &Clock<'_, T>) -> T {
        self.interval(clock, TimeUnit::Micros)
    }

    /// Returns the time in the given unit since the previous call (or since the start) and
    /// moves the start point to now.
    pub fn interval(&mut self, clock: &Clock<'_, T>, unit: TimeUnit) -> T {
        if !self.running {
            return T::ZERO;
        }

        let Some(now) = clock.now() else {
            return T::ZERO;
        };
        let elapsed = clock.elapsed_between(now, self.start_tick);
        self.start_tick = now;
        clock.ticks_to(unit, elapsed)
    }

    fn latch(&mut self, elapsed: T) -> bool {
        if elapsed >= self.timeout {
            log::trace!("Timeout of {} ticks reached after {} ticks", self.timeout, elapsed);
            self.timed_out = true;
        }
        self.timed_out
    }
}
