use std::cell::Cell;

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    timer::CountDown,
};
use tickchrono_core::{
    time::{Microseconds, Milliseconds},
    Clock, TickCounter, TickSource,
};

struct FreeRunning(Cell<u32>);

impl TickCounter<u32> for FreeRunning {
    fn current(&self) -> u32 {
        let tick = self.0.get();
        self.0.set(tick.wrapping_add(1));
        tick
    }
}

#[test]
fn test_blocking_delays() {
    let _ = env_logger::try_init();

    let counter = FreeRunning(Cell::new(0));
    let mut clock = Clock::new();
    clock
        .init(u32::MAX, 1000, TickSource::variable(&counter))
        .unwrap();

    let start = counter.0.get();
    DelayUs::<u32>::delay_us(&mut clock, 250);
    assert!(counter.0.get() - start > 250);

    let start = counter.0.get();
    DelayMs::<u16>::delay_ms(&mut clock, 3);
    assert!(counter.0.get() - start > 3_000);

    let start = counter.0.get();
    DelayUs::<u8>::delay_us(&mut clock, 0);
    assert_eq!(counter.0.get() - start, 2);
}

/// Counts one tick per read and wraps after 1000.
struct ShortPeriod {
    tick: Cell<u32>,
    reads: Cell<u32>,
}

impl TickCounter<u32> for ShortPeriod {
    fn current(&self) -> u32 {
        let tick = self.tick.get();
        self.tick.set((tick + 1) % 1001);
        self.reads.set(self.reads.get() + 1);
        tick
    }
}

#[test]
fn test_blocking_delay_longer_than_counter_period() {
    let _ = env_logger::try_init();

    let counter = ShortPeriod {
        tick: Cell::new(321),
        reads: Cell::new(0),
    };
    let mut clock = Clock::new();
    clock.init(1000, 1000, TickSource::variable(&counter)).unwrap();

    counter.reads.set(0);
    DelayMs::<u8>::delay_ms(&mut clock, 20);
    assert!(counter.reads.get() >= 20_000);

    counter.reads.set(0);
    DelayUs::<u16>::delay_us(&mut clock, 3_000);
    assert!(counter.reads.get() >= 3_000);
}

#[test]
fn test_countdown_is_periodic() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0_u32);
    let mut clock = Clock::new();
    clock
        .init(u32::MAX, 1000, TickSource::variable(&counter))
        .unwrap();

    let mut timer = clock.countdown();
    assert!(timer.wait().is_ok());

    timer.start(Milliseconds(2));
    assert!(timer.is_running());
    counter.set(1_999);
    assert_eq!(timer.wait(), Err(nb::Error::WouldBlock));
    counter.set(2_000);
    assert_eq!(timer.wait(), Ok(()));

    // Re-armed once the expiry is observed.
    counter.set(3_999);
    assert_eq!(timer.wait(), Err(nb::Error::WouldBlock));
    counter.set(4_000);
    assert_eq!(timer.wait(), Ok(()));

    timer.cancel();
    assert!(!timer.is_running());
}

#[test]
fn test_countdown_blocks() {
    let _ = env_logger::try_init();

    let counter = FreeRunning(Cell::new(0));
    let mut clock = Clock::new();
    clock
        .init(u32::MAX, 1000, TickSource::variable(&counter))
        .unwrap();

    let mut timer = clock.countdown();
    timer.start(Microseconds(500));
    nb::block!(timer.wait()).unwrap();
    assert!(counter.0.get() >= 500);
}

#[test]
fn test_countdown_without_microseconds() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0_u32);
    let mut clock = Clock::new();
    clock
        .init(u32::MAX, 1_000_000, TickSource::variable(&counter))
        .unwrap();

    let mut timer = clock.countdown();
    timer.start(Microseconds(10));
    assert!(!timer.is_running());
    assert!(timer.wait().is_ok());
}
