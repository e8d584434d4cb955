//! Tick based time measurement for embedded systems.
//!
//! A [`Clock`] wraps a free running hardware or software tick counter and turns raw ticks into
//! time lengths, taking a single counter overflow between two samples into account.
//! [`Chrono`] timers measure elapsed time, timeouts and intervals on top of a clock, and
//! [`ChronoLong`] does the same for time lengths longer than one counter period.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub use crate::{
    chrono::Chrono,
    clock::Clock,
    config::{ClockConfig, DEFAULT_CONFIG},
    engine::{CountingDirection, Tick, TimeUnit},
    errors::{InitError, Result, INIT_OK},
    hal::Countdown,
    long::{ChronoLong, MillisSource},
    tick::{TickCounter, TickSource},
};

pub mod chrono;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod hal;
pub mod long;
pub mod scaler;
pub mod tick;
pub mod time;
