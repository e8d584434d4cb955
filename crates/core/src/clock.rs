//! Tick generator configuration and module-level time functions.

use core::cell::Cell;

use crate::{
    config::ClockConfig,
    engine::{wrapping_elapsed, Coefficients, CountingDirection, Tick, TimeUnit},
    errors::{InitError, Result},
    tick::TickSource,
};

/// Configuration that passed validation.
#[derive(Debug, Clone, Copy)]
struct State<'a, T: Tick> {
    source: TickSource<'a, T>,
    config: ClockConfig<T>,
    coefficients: Coefficients,
    init_tick: T,
}

/// Folds raw tick spans into a 64-bit time counter.
#[derive(Debug)]
struct Accumulator<T: Tick> {
    last_tick: Cell<T>,
    residual_ticks: Cell<u64>,
    total: Cell<u64>,
}

impl<T: Tick> Accumulator<T> {
    const fn new() -> Self {
        Self {
            last_tick: Cell::new(T::ZERO),
            residual_ticks: Cell::new(0),
            total: Cell::new(0),
        }
    }

    fn reset(&self, tick: T) {
        self.last_tick.set(tick);
        self.residual_ticks.set(0);
        self.total.set(0);
    }

    fn fold(&self, now: T, elapsed: T, ticks_per_unit: u32) -> u64 {
        let ticks = self.residual_ticks.get() + elapsed.into_u64();
        let ticks_per_unit = u64::from(ticks_per_unit);

        self.total.set(self.total.get() + ticks / ticks_per_unit);
        self.residual_ticks.set(ticks % ticks_per_unit);
        self.last_tick.set(now);
        self.total.get()
    }
}

/// A tick generator handle.
///
/// The clock wraps a monotonically counting tick source and converts raw ticks into seconds,
/// milliseconds and microseconds. A freshly created clock is not initialized: every query on
/// it returns the zero value of its type until [`Clock::init`] succeeds.
///
/// All measurements tolerate at most one counter overflow between two samples. Sampling less
/// often than once per counter period leads to silently wrong results.
///
/// The clock is `!Sync`, the continuous time counters are not re-entrant.
#[derive(Debug)]
pub struct Clock<'a, T: Tick> {
    state: Option<State<'a, T>>,
    continuous_us: Accumulator<T>,
    continuous_ms: Accumulator<T>,
    continuous_s: Accumulator<T>,
}

impl<'a, T: Tick> Default for Clock<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Tick> Clock<'a, T> {
    /// Creates an uninitialized clock.
    pub const fn new() -> Self {
        Self {
            state: None,
            continuous_us: Accumulator::new(),
            continuous_ms: Accumulator::new(),
            continuous_s: Accumulator::new(),
        }
    }

    /// Creates a clock and initializes it with the given configuration.
    pub fn with_config(config: ClockConfig<T>, source: TickSource<'a, T>) -> Result<Self> {
        let mut clock = Self::new();
        clock.init_with_config(config, source)?;
        Ok(clock)
    }

    /// Initializes the clock for an up-counting tick generator.
    ///
    /// See [`Clock::init_with_config`].
    pub fn init(
        &mut self,
        tick_top_value: T,
        tick_to_ns: u32,
        source: TickSource<'a, T>,
    ) -> Result<()> {
        self.init_with_config(ClockConfig::new(tick_top_value, tick_to_ns), source)
    }

    /// Initializes the clock.
    ///
    /// The previous configuration is discarded first, so on failure the clock is left
    /// uninitialized.
    pub fn init_with_config(
        &mut self,
        config: ClockConfig<T>,
        source: TickSource<'a, T>,
    ) -> Result<()> {
        self.state = None;

        let result = Self::validate(&config, &source);
        if let Err(err) = result {
            log::warn!("Unable to initialize clock with {:?}: {}", config, err);
            return result;
        }

        let coefficients = Coefficients::from_tick_period(config.tick_to_ns);
        let init_tick = source.read();
        self.continuous_us.reset(init_tick);
        self.continuous_ms.reset(init_tick);
        self.continuous_s.reset(init_tick);
        self.state = Some(State {
            source,
            config,
            coefficients,
            init_tick,
        });

        log::debug!(
            "Clock initialized: top={}, tick={}ns, direction={}, {:?}",
            config.tick_top_value,
            config.tick_to_ns,
            config.direction,
            coefficients
        );
        Ok(())
    }

    fn validate(config: &ClockConfig<T>, source: &TickSource<'a, T>) -> Result<()> {
        if config.tick_top_value == T::ZERO {
            return Err(InitError::TickTopZero);
        }
        if config.tick_to_ns == 0 {
            return Err(InitError::TickToNsZero);
        }
        if source.is_null() {
            return Err(InitError::TickPtrError);
        }
        Ok(())
    }

    /// Returns `true` if the clock has been successfully initialized.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Returns `true` if the tick is fine enough to measure time in the given unit.
    pub fn is_available(&self, unit: TimeUnit) -> bool {
        self.ticks_per(unit).is_some()
    }

    /// Returns `true` if time can be measured in microseconds.
    pub fn is_us_available(&self) -> bool {
        self.is_available(TimeUnit::Micros)
    }

    /// Returns `true` if time can be measured in milliseconds.
    pub fn is_ms_available(&self) -> bool {
        self.is_available(TimeUnit::Millis)
    }

    /// Returns `true` if time can be measured in seconds.
    pub fn is_s_available(&self) -> bool {
        self.is_available(TimeUnit::Seconds)
    }

    /// Returns the current tick value.
    pub fn tick(&self) -> T {
        self.now().unwrap_or(T::ZERO)
    }

    /// Returns the tick top value.
    pub fn tick_top_value(&self) -> T {
        self.state
            .as_ref()
            .map_or(T::ZERO, |state| state.config.tick_top_value)
    }

    /// Returns the duration of one tick in nanoseconds.
    pub fn tick_to_ns_coef(&self) -> u32 {
        self.state
            .as_ref()
            .map_or(0, |state| state.config.tick_to_ns)
    }

    /// Returns the tick source passed to the initialization.
    pub fn tick_source(&self) -> Option<TickSource<'a, T>> {
        self.state.as_ref().map(|state| state.source)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> Option<ClockConfig<T>> {
        self.state.as_ref().map(|state| state.config)
    }

    /// Returns the counting mode of the tick generator.
    pub fn counting_direction(&self) -> Option<CountingDirection> {
        self.state.as_ref().map(|state| state.config.direction)
    }

    /// Returns the tick value captured during the initialization.
    pub fn init_tick(&self) -> T {
        self.state.as_ref().map_or(T::ZERO, |state| state.init_tick)
    }

    /// Returns the maximum time length in seconds that can be measured without ambiguity.
    pub fn max_measurable_time_s(&self) -> T {
        self.max_measurable_time(TimeUnit::Seconds)
    }

    /// Returns the maximum time length in milliseconds that can be measured without ambiguity.
    pub fn max_measurable_time_ms(&self) -> T {
        self.max_measurable_time(TimeUnit::Millis)
    }

    /// Returns the maximum time length in microseconds that can be measured without ambiguity.
    pub fn max_measurable_time_us(&self) -> T {
        self.max_measurable_time(TimeUnit::Micros)
    }

    /// Returns the maximum time length in the given unit that can be measured without
    /// ambiguity, that is a single counter period.
    pub fn max_measurable_time(&self, unit: TimeUnit) -> T {
        self.ticks_to(unit, self.tick_top_value())
    }

    /// Returns the time length in seconds between two ticks.
    pub fn time_span_s(&self, start_tick: T, end_tick: T) -> T {
        self.time_span(TimeUnit::Seconds, start_tick, end_tick)
    }

    /// Returns the time length in milliseconds between two ticks.
    pub fn time_span_ms(&self, start_tick: T, end_tick: T) -> T {
        self.time_span(TimeUnit::Millis, start_tick, end_tick)
    }

    /// Returns the time length in microseconds between two ticks.
    pub fn time_span_us(&self, start_tick: T, end_tick: T) -> T {
        self.time_span(TimeUnit::Micros, start_tick, end_tick)
    }

    /// Returns the time length in the given unit between two ticks.
    ///
    /// A single counter overflow between `start_tick` and `end_tick` is handled, more than one
    /// leads to a wrong result.
    pub fn time_span(&self, unit: TimeUnit, start_tick: T, end_tick: T) -> T {
        self.ticks_to(unit, self.time_span_tick(start_tick, end_tick))
    }

    /// Returns the number of ticks between two ticks.
    pub fn time_span_tick(&self, start_tick: T, end_tick: T) -> T {
        self.elapsed_between(end_tick, start_tick)
    }

    /// Returns the time in microseconds since the initialization.
    ///
    /// This function must be called at least once per counter period, otherwise whole periods
    /// are silently lost.
    pub fn continuous_us(&self) -> u64 {
        self.continuous(TimeUnit::Micros)
    }

    /// Returns the time in milliseconds since the initialization.
    ///
    /// See [`Clock::continuous_us`].
    pub fn continuous_ms(&self) -> u64 {
        self.continuous(TimeUnit::Millis)
    }

    /// Returns the time in seconds since the initialization.
    ///
    /// See [`Clock::continuous_us`].
    pub fn continuous_s(&self) -> u64 {
        self.continuous(TimeUnit::Seconds)
    }

    /// Returns the time in the given unit since the initialization.
    ///
    /// Each call folds the ticks passed since the previous call into a 64-bit counter, ticks
    /// that do not make up a whole unit are carried over to the next call.
    pub fn continuous(&self, unit: TimeUnit) -> u64 {
        let (Some(now), Some(ticks_per_unit)) = (self.now(), self.ticks_per(unit)) else {
            return 0;
        };

        let accumulator = match unit {
            TimeUnit::Seconds => &self.continuous_s,
            TimeUnit::Millis => &self.continuous_ms,
            TimeUnit::Micros => &self.continuous_us,
        };
        let elapsed = self.elapsed_between(now, accumulator.last_tick.get());
        accumulator.fold(now, elapsed, ticks_per_unit)
    }

    /// Blocks for the given number of seconds.
    pub fn delay_s(&self, delay: T) {
        self.delay(TimeUnit::Seconds, delay.into_u64());
    }

    /// Blocks for the given number of milliseconds.
    pub fn delay_ms(&self, delay: T) {
        self.delay(TimeUnit::Millis, delay.into_u64());
    }

    /// Blocks for the given number of microseconds.
    pub fn delay_us(&self, delay: T) {
        self.delay(TimeUnit::Micros, delay.into_u64());
    }

    /// Busy-waits until the given time length passes.
    ///
    /// Returns immediately if the clock is not initialized or the unit is not available.
    /// Delays longer than one counter period are measured in steps of half a period, so the
    /// tick source must be sampled at least that often.
    pub fn delay(&self, unit: TimeUnit, delay: u64) {
        let (Some(mut start), Some(ticks_per_unit)) = (self.now(), self.ticks_per(unit)) else {
            return;
        };

        let max_step = (self.tick_top_value().into_u64() / 2).max(1);
        let mut remaining = delay.saturating_mul(u64::from(ticks_per_unit));
        loop {
            let now = self.tick();
            let elapsed = self.elapsed_between(now, start).into_u64();
            if elapsed >= remaining {
                break;
            }
            if elapsed >= max_step {
                remaining -= elapsed;
                start = now;
            }
            core::hint::spin_loop();
        }
    }

    /// Reads the tick source, `None` if the clock is not initialized.
    #[inline]
    pub(crate) fn now(&self) -> Option<T> {
        self.state.as_ref().map(|state| state.source.read())
    }

    /// Ticks between `b` and the chronologically later `a`.
    #[inline]
    pub(crate) fn elapsed_between(&self, a: T, b: T) -> T {
        match &self.state {
            Some(state) => {
                wrapping_elapsed(a, b, state.config.tick_top_value, state.config.direction)
            }
            None => T::ZERO,
        }
    }

    #[inline]
    pub(crate) fn ticks_per(&self, unit: TimeUnit) -> Option<u32> {
        self.state
            .as_ref()
            .and_then(|state| state.coefficients.ticks_per(unit))
    }

    /// Converts ticks to the given unit.
    #[inline]
    pub(crate) fn ticks_to(&self, unit: TimeUnit, ticks: T) -> T {
        match &self.state {
            Some(state) => state.coefficients.ticks_to(unit, ticks),
            None => T::ZERO,
        }
    }

    /// Converts a time length to ticks, saturating at the longest reachable elapsed value.
    ///
    /// From any start tick but zero the elapsed ticks peak at `top - 1` before the counter
    /// returns to the start, so that is the longest timeout that can fire.
    ///
    /// Returns `None` if the unit is not available.
    pub(crate) fn to_ticks(&self, unit: TimeUnit, value: u64) -> Option<T> {
        let state = self.state.as_ref()?;
        state.coefficients.ticks_per(unit)?;

        let ticks = state.coefficients.to_ticks(unit, value);
        let max_ticks = state.config.tick_top_value.into_u64() - 1;
        if ticks > max_ticks {
            log::warn!(
                "{}{} exceeds the counter period, saturating to {} ticks",
                value,
                unit,
                max_ticks
            );
            return Some(T::from_u64_saturating(max_ticks));
        }
        Some(T::from_u64_saturating(ticks))
    }
}
