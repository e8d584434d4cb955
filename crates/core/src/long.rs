//! Timer objects for time lengths longer than one counter period.

use crate::{
    clock::Clock,
    engine::{wrapping_elapsed, CountingDirection, Tick},
};

const MILLIS_PER_SEC: u64 = 1_000;

/// A 64-bit cumulative millisecond counter.
pub trait MillisSource {
    /// Returns the number of milliseconds since some fixed point in the past.
    fn millis(&self) -> u64;

    /// Returns `false` while the source cannot count milliseconds yet.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<'a, T: Tick> MillisSource for Clock<'a, T> {
    /// Folds the raw counter into the continuous millisecond counter.
    ///
    /// It must be sampled at least once per counter period.
    fn millis(&self) -> u64 {
        self.continuous_ms()
    }

    fn is_ready(&self) -> bool {
        self.is_ms_available()
    }
}

/// A timer object on top of a [`MillisSource`].
///
/// It behaves like [`Chrono`](crate::Chrono) but measures up to `u64::MAX` milliseconds in
/// millisecond and second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChronoLong {
    running: bool,
    start_ms: u64,
    timeout_ms: u64,
    timed_out: bool,
}

impl ChronoLong {
    /// Creates a stopped timer.
    pub const fn new() -> Self {
        Self {
            running: false,
            start_ms: 0,
            timeout_ms: 0,
            timed_out: false,
        }
    }

    /// Returns `true` if the timer is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns the timeout set by the last timed start.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Starts the time measurement.
    ///
    /// Does nothing if the source is not ready, e.g. an uninitialized clock.
    pub fn start(&mut self, source: &impl MillisSource) {
        if !source.is_ready() {
            return;
        }
        self.start_ms = source.millis();
        self.running = true;
    }

    /// Stops the time measurement and clears the timeout flag.
    pub fn stop(&mut self) {
        self.running = false;
        self.timed_out = false;
    }

    /// Starts the time measurement with a timeout in seconds.
    pub fn start_timeout_s(&mut self, source: &impl MillisSource, timeout: u64) {
        self.start_timeout_ms(source, timeout.saturating_mul(MILLIS_PER_SEC));
    }

    /// Starts the time measurement with a timeout in milliseconds.
    pub fn start_timeout_ms(&mut self, source: &impl MillisSource, timeout: u64) {
        self.timeout_ms = timeout;
        self.timed_out = false;
        self.start(source);
    }

    /// Returns the time in seconds since the start, zero if the timer is stopped.
    pub fn elapsed_s(&self, source: &impl MillisSource) -> u64 {
        self.elapsed_ms(source) / MILLIS_PER_SEC
    }

    /// Returns the time in milliseconds since the start, zero if the timer is stopped.
    pub fn elapsed_ms(&self, source: &impl MillisSource) -> u64 {
        if !self.running {
            return 0;
        }

        wrapping_elapsed(
            source.millis(),
            self.start_ms,
            u64::MAX,
            CountingDirection::Up,
        )
    }

    /// Returns the time in seconds left until the timeout.
    ///
    /// The timeout is detected with millisecond resolution, so this may return zero while
    /// [`ChronoLong::left_ms`] would still report a few hundred milliseconds.
    pub fn left_s(&mut self, source: &impl MillisSource) -> u64 {
        if !self.running || self.timed_out {
            return 0;
        }

        let elapsed = self.elapsed_ms(source);
        if self.latch(elapsed) {
            return 0;
        }
        self.timeout_ms / MILLIS_PER_SEC - elapsed / MILLIS_PER_SEC
    }

    /// Returns the time in milliseconds left until the timeout.
    pub fn left_ms(&mut self, source: &impl MillisSource) -> u64 {
        if !self.running || self.timed_out {
            return 0;
        }

        let elapsed = self.elapsed_ms(source);
        if self.latch(elapsed) {
            return 0;
        }
        self.timeout_ms - elapsed
    }

    /// Returns `true` if the timeout has been reached, the result is latched until restart.
    pub fn is_timeout(&mut self, source: &impl MillisSource) -> bool {
        if !self.running {
            return false;
        }
        if self.timed_out {
            return true;
        }

        let elapsed = self.elapsed_ms(source);
        self.latch(elapsed)
    }

    fn latch(&mut self, elapsed_ms: u64) -> bool {
        if elapsed_ms >= self.timeout_ms {
            log::trace!(
                "Long timeout of {}ms reached after {}ms",
                self.timeout_ms,
                elapsed_ms
            );
            self.timed_out = true;
        }
        self.timed_out
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;

    struct Manual(Cell<u64>);

    impl MillisSource for Manual {
        fn millis(&self) -> u64 {
            self.0.get()
        }
    }

    #[test]
    fn test_left_s_uses_whole_seconds() {
        let source = Manual(Cell::new(0));
        let mut chrono = ChronoLong::new();
        chrono.start_timeout_s(&source, 10);

        source.0.set(3_999);
        assert_eq!(chrono.left_ms(&source), 6_001);
        assert_eq!(chrono.left_s(&source), 7);

        source.0.set(9_999);
        assert_eq!(chrono.left_s(&source), 1);
        assert!(!chrono.is_timeout(&source));

        source.0.set(10_000);
        assert_eq!(chrono.left_s(&source), 0);
        assert!(chrono.is_timeout(&source));
    }

    #[test]
    fn test_elapsed_across_counter_wrap() {
        let source = Manual(Cell::new(u64::MAX - 10));
        let mut chrono = ChronoLong::new();
        chrono.start(&source);

        source.0.set(5);
        assert_eq!(chrono.elapsed_ms(&source), 15);
    }

    #[test]
    fn test_uninitialized_clock() {
        let clock = Clock::<u32>::new();
        let mut chrono = ChronoLong::new();

        chrono.start(&clock);
        assert!(!chrono.is_running());

        chrono.start_timeout_s(&clock, 10);
        assert!(!chrono.is_running());
        assert!(!chrono.is_timeout(&clock));
        assert_eq!(chrono.left_s(&clock), 0);
    }

    #[test]
    fn test_stopped() {
        let source = Manual(Cell::new(100));
        let mut chrono = ChronoLong::new();
        assert_eq!(chrono.elapsed_ms(&source), 0);
        assert_eq!(chrono.left_ms(&source), 0);
        assert!(!chrono.is_timeout(&source));

        chrono.start_timeout_ms(&source, 1);
        source.0.set(200);
        assert!(chrono.is_timeout(&source));
        chrono.stop();
        assert!(!chrono.is_running());
        assert!(!chrono.is_timeout(&source));
    }
}
