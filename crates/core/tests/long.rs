use std::cell::Cell;

use tickchrono_core::{ChronoLong, Clock, MillisSource, TickSource};

// One nanosecond ticks, the counter overflows every 4.294967296 seconds.
const TOP: u32 = 0xFFFF_FFFF;
const TICK_NS: u32 = 1;

fn nanosecond_clock(counter: &Cell<u32>) -> Clock<'_, u32> {
    counter.set(0);
    Clock::with_config(
        tickchrono_core::ClockConfig::new(TOP, TICK_NS),
        TickSource::variable(counter),
    )
    .unwrap()
}

#[test]
fn test_elapsed_s_over_multiple_overflows() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0);
    let clock = nanosecond_clock(&counter);

    let mut chrono = ChronoLong::new();
    chrono.start(&clock);
    assert_eq!(chrono.elapsed_s(&clock), 0);

    let expected: [(u32, u64); 9] = [
        (1_100_000_000, 1),
        (2_100_000_000, 2),
        (3_100_000_000, 3),
        (4_100_000_000, 4),
        // First overflow.
        (0, 4),
        (806_000_000, 5),
        (1_806_000_001, 6),
        // Second overflow.
        (0, 8),
        (420_000_000, 9),
    ];
    for (tick, elapsed) in expected {
        counter.set(tick);
        assert_eq!(chrono.elapsed_s(&clock), elapsed, "tick={tick}");
    }
}

#[test]
fn test_elapsed_ms_over_multiple_overflows() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0);
    let clock = nanosecond_clock(&counter);

    let mut chrono = ChronoLong::new();
    chrono.start(&clock);
    assert_eq!(chrono.elapsed_ms(&clock), 0);

    // Sub-millisecond remainders are carried over, so nothing is lost across overflows.
    let expected: [(u32, u64); 9] = [
        (1_000_000_000, 1000),
        (2_000_000_000, 2000),
        (3_000_000_000, 3000),
        (4_000_000_000, 4000),
        (0, 4294),
        (706_000_000, 5000),
        (1_706_000_000, 6000),
        (0, 8589),
        (420_000_000, 9009),
    ];
    for (tick, elapsed) in expected {
        counter.set(tick);
        assert_eq!(chrono.elapsed_ms(&clock), elapsed, "tick={tick}");
    }
}

#[test]
fn test_left_s_over_multiple_overflows() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0);
    let clock = nanosecond_clock(&counter);

    let mut chrono = ChronoLong::new();
    chrono.start_timeout_s(&clock, 10);
    assert_eq!(chrono.timeout_ms(), 10_000);
    assert_eq!(chrono.left_s(&clock), 10);

    counter.set(TOP);
    assert_eq!(chrono.left_s(&clock), 6);
    counter.set(0);
    assert_eq!(chrono.left_s(&clock), 6);

    counter.set(TOP);
    chrono.left_s(&clock);
    counter.set(0);
    assert_eq!(chrono.left_s(&clock), 2);

    counter.set(TOP);
    chrono.left_s(&clock);
    counter.set(0);
    assert_eq!(chrono.left_s(&clock), 0);
}

#[test]
fn test_left_ms_over_multiple_overflows() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0);
    let clock = nanosecond_clock(&counter);

    let mut chrono = ChronoLong::new();
    chrono.start_timeout_ms(&clock, 10_000);
    assert_eq!(chrono.left_ms(&clock), 10_000);

    counter.set(TOP);
    assert_eq!(chrono.left_ms(&clock), 5706);
    counter.set(0);
    assert_eq!(chrono.left_ms(&clock), 5706);

    counter.set(TOP);
    chrono.left_ms(&clock);
    counter.set(0);
    assert_eq!(chrono.left_ms(&clock), 1411);

    counter.set(TOP);
    chrono.left_ms(&clock);
    counter.set(0);
    assert_eq!(chrono.left_ms(&clock), 0);
}

#[test]
fn test_very_long_timeout() {
    let _ = env_logger::try_init();

    let counter = Cell::new(0);
    let clock = nanosecond_clock(&counter);

    let mut by_seconds = ChronoLong::new();
    let mut by_millis = ChronoLong::new();
    by_seconds.start_timeout_s(&clock, 10);
    by_millis.start_timeout_ms(&clock, 10_000);
    assert!(!by_seconds.is_timeout(&clock));
    assert!(!by_millis.is_timeout(&clock));

    for overflow in 1..=3 {
        counter.set(TOP);
        // The continuous counter is shared, sample it once per period.
        clock.millis();
        counter.set(0);

        let expired = overflow == 3;
        assert_eq!(by_seconds.is_timeout(&clock), expired, "overflow {overflow}");
        assert_eq!(by_millis.is_timeout(&clock), expired, "overflow {overflow}");
    }

    // The timeout flag is latched.
    assert!(by_seconds.is_timeout(&clock));
    assert_eq!(by_seconds.left_ms(&clock), 0);
    by_seconds.stop();
    assert!(!by_seconds.is_timeout(&clock));
}
