use serde::{Deserialize, Serialize};

use crate::engine::{CountingDirection, Tick};

/// Tick generator parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig<T> {
    /// The top value that the tick generator counts up to (or down from).
    ///
    /// For example, a timer that counts up to `0xFFFF_FFFF` has exactly this top value.
    pub tick_top_value: T,
    /// Duration of one tick increment in nanoseconds.
    ///
    /// For example, a timer clocked at 1MHz has a coefficient of `1000`.
    pub tick_to_ns: u32,
    /// Counting mode of the tick generator.
    pub direction: CountingDirection,
}

impl<T: Tick> ClockConfig<T> {
    /// Creates a configuration for an up-counting tick generator.
    pub const fn new(tick_top_value: T, tick_to_ns: u32) -> Self {
        Self {
            tick_top_value,
            tick_to_ns,
            direction: CountingDirection::Up,
        }
    }

    /// Sets the counting mode of the tick generator.
    #[must_use]
    pub const fn with_direction(mut self, direction: CountingDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// A 32-bit up-counting timer clocked at 1MHz.
pub const DEFAULT_CONFIG: ClockConfig<u32> = ClockConfig::new(0xFFFF_FFFF, 1_000);
