use std::time::Instant;

use clap::{CommandFactory, Parser, Subcommand};
use tickchrono_core::{
    scaler::RunEvery, Chrono, Clock, ClockConfig, TickCounter, TickSource, TimeUnit,
};

/// Tick based time measurement console
///
/// A command line application for exercising the tick clock on top of the host monotonic timer
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = false)]
struct Cli {
    /// Tick top value of the emulated counter
    #[arg(long, default_value_t = u32::MAX)]
    top: u32,
    /// Duration of one tick in nanoseconds
    #[arg(long = "tick-ns", default_value_t = 1_000, value_name = "NS")]
    tick_ns: u32,
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current tick periodically
    Tick {
        /// Number of ticks to print
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        /// Print period
        #[arg(short, long = "period-ms", default_value_t = 500, value_name = "MS")]
        period_ms: u32,
    },
    /// Block for the given number of microseconds
    DelayUs { value: u32 },
    /// Block for the given number of milliseconds
    DelayMs { value: u32 },
    /// Block for the given number of seconds
    DelayS { value: u32 },
    /// Compute the time length between two ticks
    Span { start: u32, end: u32 },
    /// Show the clock configuration
    Info,
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

/// A tick counter emulated by the host monotonic timer.
struct HostCounter {
    started_at: Instant,
    tick_ns: u32,
    top: u32,
}

impl HostCounter {
    fn new(config: &ClockConfig<u32>) -> Self {
        Self {
            started_at: Instant::now(),
            tick_ns: config.tick_to_ns,
            top: config.tick_top_value,
        }
    }
}

impl TickCounter<u32> for HostCounter {
    fn current(&self) -> u32 {
        let ticks = self.started_at.elapsed().as_nanos() / u128::from(self.tick_ns.max(1));
        (ticks % (u128::from(self.top) + 1)) as u32
    }
}

fn delay(clock: &Clock<'_, u32>, unit: TimeUnit, value: u32) {
    println!("Delay {value}{unit} start...");

    let mut chrono = Chrono::new();
    chrono.start(clock);
    match unit {
        TimeUnit::Seconds => clock.delay_s(value),
        TimeUnit::Millis => clock.delay_ms(value),
        TimeUnit::Micros => clock.delay_us(value),
    }
    let elapsed = chrono.elapsed_ticks(clock);

    println!("End, {} ticks ({}us)", elapsed, chrono.elapsed_us(clock));
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ClockConfig::new(cli.top, cli.tick_ns);
    let counter = HostCounter::new(&config);
    let clock = Clock::with_config(config, TickSource::variable(&counter))?;
    log::debug!("Host clock started with {:?}", config);

    match cli.command {
        Command::Tick { count, period_ms } => {
            anyhow::ensure!(clock.is_ms_available(), "milliseconds are not available");

            let mut every = RunEvery::forced(period_ms, TimeUnit::Millis);
            let mut printed = 0;
            while printed < count {
                match every.poll(&clock) {
                    Some(_) => {
                        println!("Tick = {:10}", clock.tick());
                        printed += 1;
                    }
                    None => std::thread::yield_now(),
                }
            }
        }
        Command::DelayUs { value } => delay(&clock, TimeUnit::Micros, value),
        Command::DelayMs { value } => delay(&clock, TimeUnit::Millis, value),
        Command::DelayS { value } => delay(&clock, TimeUnit::Seconds, value),
        Command::Span { start, end } => {
            println!("ticks: {}", clock.time_span_tick(start, end));
            println!("s:     {}", clock.time_span_s(start, end));
            println!("ms:    {}", clock.time_span_ms(start, end));
            println!("us:    {}", clock.time_span_us(start, end));
        }
        Command::Info => {
            println!("top value: {:#x}", clock.tick_top_value());
            println!("tick:      {}ns", clock.tick_to_ns_coef());
            println!("direction: {}", clock.counting_direction().unwrap_or_default());
            println!("current:   {}", clock.tick());
            for unit in [TimeUnit::Seconds, TimeUnit::Millis, TimeUnit::Micros] {
                if clock.is_available(unit) {
                    println!("max {}: {}", unit, clock.max_measurable_time(unit));
                } else {
                    println!("max {}: unavailable", unit);
                }
            }
        }
        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}
