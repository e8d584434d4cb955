pub use embedded_hal::timer::CountDown;

use crate::engine::TimeUnit;

macro_rules! impl_time_unit {
    ($name:ident, $unit:expr, $secs_factor:expr) => {
        #[derive(PartialEq, PartialOrd, Clone, Copy, Eq, Debug, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            pub const SECS_FACTOR: u32 = $secs_factor;
            pub const UNIT: TimeUnit = $unit;
        }

        impl From<u32> for $name {
            fn from(inner: u32) -> Self {
                Self(inner)
            }
        }

        impl From<$name> for u32 {
            fn from(time: $name) -> Self {
                time.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}{}", self.0, Self::UNIT)
            }
        }
    };
}

impl_time_unit!(Seconds, TimeUnit::Seconds, 1);
impl_time_unit!(Milliseconds, TimeUnit::Millis, 1_000);
impl_time_unit!(Microseconds, TimeUnit::Micros, 1_000_000);

impl From<Seconds> for Milliseconds {
    fn from(s: Seconds) -> Self {
        Self(s.0.saturating_mul(Milliseconds::SECS_FACTOR))
    }
}

impl From<Seconds> for Microseconds {
    fn from(s: Seconds) -> Self {
        Self(s.0.saturating_mul(Microseconds::SECS_FACTOR))
    }
}

impl From<Milliseconds> for Microseconds {
    fn from(ms: Milliseconds) -> Self {
        Self(ms.0.saturating_mul(1_000))
    }
}
