//! Overflow-safe tick arithmetic and unit conversions.

use core::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

/// Nanoseconds in one microsecond.
pub const NANOS_PER_MICRO: u32 = 1_000;
/// Nanoseconds in one millisecond.
pub const NANOS_PER_MILLI: u32 = 1_000_000;
/// Nanoseconds in one second.
pub const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Unsigned integer type of a raw tick counter.
///
/// Time values returned by the clock use the same type as ticks, since a time length in any
/// supported unit never exceeds the number of ticks it was computed from.
pub trait Tick: Copy + Ord + Default + Debug + Display {
    /// Zero tick.
    const ZERO: Self;
    /// The largest value representable by the counter type.
    const MAX: Self;

    /// Widens the tick value.
    fn into_u64(self) -> u64;
    /// Narrows a value, saturating at [`Self::MAX`].
    fn from_u64_saturating(value: u64) -> Self;
    /// Modular subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_tick {
    ($ty:ty) => {
        impl Tick for $ty {
            const ZERO: Self = 0;
            const MAX: Self = <$ty>::MAX;

            #[inline]
            fn into_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_u64_saturating(value: u64) -> Self {
                if value > Self::MAX as u64 {
                    Self::MAX
                } else {
                    value as $ty
                }
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }
        }
    };
}

impl_tick!(u8);
impl_tick!(u16);
impl_tick!(u32);
impl_tick!(u64);

/// Counting mode of the tick generator.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum CountingDirection {
    /// The counter starts from zero and counts up to the top value.
    #[default]
    Up,
    /// The counter starts from the top value and counts down to zero.
    Down,
}

impl Display for CountingDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CountingDirection::Up => f.write_str("up"),
            CountingDirection::Down => f.write_str("down"),
        }
    }
}

/// Time unit of a measurement.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
}

impl TimeUnit {
    /// Nanoseconds in one unit.
    pub const fn nanos(self) -> u32 {
        match self {
            TimeUnit::Seconds => NANOS_PER_SEC,
            TimeUnit::Millis => NANOS_PER_MILLI,
            TimeUnit::Micros => NANOS_PER_MICRO,
        }
    }
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimeUnit::Seconds => f.write_str("s"),
            TimeUnit::Millis => f.write_str("ms"),
            TimeUnit::Micros => f.write_str("us"),
        }
    }
}

/// Returns the number of ticks between `b` and `a`.
///
/// Chronologically `a` must come at or after `b`, but its raw value may be on the other side of
/// `b` if the counter wrapped. The result is only correct if the counter wrapped at most once
/// between the two samples; after two or more wraps it silently undercounts.
#[inline]
pub fn wrapping_elapsed<T: Tick>(a: T, b: T, top: T, direction: CountingDirection) -> T {
    match direction {
        CountingDirection::Up => {
            if a >= b {
                a.wrapping_sub(b)
            } else {
                top.wrapping_sub(b.wrapping_sub(a))
            }
        }
        CountingDirection::Down => {
            if a <= b {
                b.wrapping_sub(a)
            } else {
                top.wrapping_sub(a.wrapping_sub(b))
            }
        }
    }
}

/// Ticks per time unit, derived once from the tick period.
///
/// A zero coefficient means the tick is too coarse to measure the corresponding unit.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, Default)]
pub struct Coefficients {
    pub ticks_per_us: u32,
    pub ticks_per_ms: u32,
    pub ticks_per_s: u32,
}

impl Coefficients {
    /// Derives the conversion table from the tick period in nanoseconds.
    ///
    /// The caller guarantees that `tick_to_ns` is non-zero.
    pub const fn from_tick_period(tick_to_ns: u32) -> Self {
        Self {
            ticks_per_us: NANOS_PER_MICRO / tick_to_ns,
            ticks_per_ms: NANOS_PER_MILLI / tick_to_ns,
            ticks_per_s: NANOS_PER_SEC / tick_to_ns,
        }
    }

    /// Returns the number of ticks in one unit, or `None` if the unit cannot be measured.
    #[inline]
    pub const fn ticks_per(&self, unit: TimeUnit) -> Option<u32> {
        let coef = match unit {
            TimeUnit::Seconds => self.ticks_per_s,
            TimeUnit::Millis => self.ticks_per_ms,
            TimeUnit::Micros => self.ticks_per_us,
        };

        if coef == 0 {
            None
        } else {
            Some(coef)
        }
    }

    /// Converts ticks to the given unit, truncating the remainder.
    #[inline]
    pub fn ticks_to<T: Tick>(&self, unit: TimeUnit, ticks: T) -> T {
        match self.ticks_per(unit) {
            Some(coef) => T::from_u64_saturating(ticks.into_u64() / u64::from(coef)),
            None => T::ZERO,
        }
    }

    /// Converts a time length in the given unit to ticks, saturating at `u64::MAX`.
    #[inline]
    pub fn to_ticks(&self, unit: TimeUnit, value: u64) -> u64 {
        match self.ticks_per(unit) {
            Some(coef) => value.saturating_mul(u64::from(coef)),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_up_without_wrap() {
        assert_eq!(wrapping_elapsed(5_u32, 3, u32::MAX, CountingDirection::Up), 2);
        assert_eq!(wrapping_elapsed(7_u32, 7, u32::MAX, CountingDirection::Up), 0);
    }

    #[test]
    fn test_elapsed_up_with_wrap() {
        let top = 0xFFFF_FFFF_u32;
        assert_eq!(
            wrapping_elapsed(0x1000_0000, 0xFFFF_FFFE, top, CountingDirection::Up),
            0xFFFF_FFFF - 0xFFFF_FFFE + 0x1000_0000
        );
        assert_eq!(wrapping_elapsed(0, 0xFFFF_FFFE, top, CountingDirection::Up), 1);
        assert_eq!(wrapping_elapsed(3, 5, top, CountingDirection::Up), top - 2);
    }

    #[test]
    fn test_elapsed_down() {
        let top = 1000_u16;
        assert_eq!(wrapping_elapsed(990, 1000, top, CountingDirection::Down), 10);
        // Wrapped from zero back to the top value.
        assert_eq!(wrapping_elapsed(995, 5, top, CountingDirection::Down), 10);
    }

    #[test]
    fn test_coefficients() {
        let coefs = Coefficients::from_tick_period(1000);
        assert_eq!(coefs.ticks_per(TimeUnit::Micros), Some(1));
        assert_eq!(coefs.ticks_per(TimeUnit::Millis), Some(1000));
        assert_eq!(coefs.ticks_per(TimeUnit::Seconds), Some(1_000_000));

        assert_eq!(coefs.ticks_to(TimeUnit::Millis, 2_500_u32), 2);
        assert_eq!(coefs.to_ticks(TimeUnit::Millis, 3), 3000);
    }

    #[test]
    fn test_coarse_tick_disables_units() {
        let coefs = Coefficients::from_tick_period(NANOS_PER_MILLI * 10);
        assert_eq!(coefs.ticks_per(TimeUnit::Micros), None);
        assert_eq!(coefs.ticks_per(TimeUnit::Millis), None);
        assert_eq!(coefs.ticks_per(TimeUnit::Seconds), Some(100));

        assert_eq!(coefs.ticks_to(TimeUnit::Millis, 500_u32), 0);
        assert_eq!(coefs.to_ticks(TimeUnit::Micros, 500), 0);
    }

    #[test]
    fn test_narrow_tick_saturates() {
        assert_eq!(u16::from_u64_saturating(70_000), u16::MAX);
        assert_eq!(u8::from_u64_saturating(42), 42);
    }
}
