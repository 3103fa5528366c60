use std::{fs, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use golgrid::{
    config::{DEFAULT_COLS, DEFAULT_DENSITY, DEFAULT_ROWS},
    Config, Grid, Pattern, PopulationSize, Sim, SimHandle,
};

pub use view::View;
mod view;

/// Game of life on a bounded grid, in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Number of rows of the grid.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Number of columns of the grid.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
    /// Milliseconds between two generations while running.
    #[arg(
        long = "interval-ms",
        value_name = "MILLISECONDS",
        default_value_t = 200,
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    interval_ms: u64,
    /// Chance, in percent, for a generated cell to be alive.
    #[arg(
        long,
        default_value_t = DEFAULT_DENSITY,
        value_parser = clap::value_parser!(u32).range(0..=100)
    )]
    density: u32,
    /// Area of generated populations: small, medium or large.
    #[arg(long, default_value_t = PopulationSize::Medium)]
    size: PopulationSize,
    /// Seed of the random generator, for reproducible populations.
    #[arg(long)]
    seed: Option<u64>,
    /// Named pattern placed in the middle of the grid at start.
    #[arg(long, conflicts_with = "pattern_file")]
    pattern: Option<String>,
    /// Plain text pattern file (`#` or `O` alive) placed in the middle of the grid.
    #[arg(long, value_name = "PATH")]
    pattern_file: Option<PathBuf>,
    /// Keep running when the grid starts repeating itself.
    #[arg(long)]
    no_stop_on_cycle: bool,
    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Run this many generations without the terminal view, then print the result.
    #[arg(long, value_name = "GENERATIONS")]
    headless: Option<u64>,
}

impl CliArgs {
    fn config(&self) -> Config {
        Config {
            rows: self.rows,
            cols: self.cols,
            tick_interval: Duration::from_millis(self.interval_ms),
            density: self.density,
            population_size: self.size,
            seed: self.seed,
            stop_on_cycle: !self.no_stop_on_cycle,
        }
    }

    fn pattern(&self) -> Result<Option<Pattern>> {
        if let Some(name) = &self.pattern {
            return Ok(Some(Pattern::named(name)?));
        }
        let Some(path) = &self.pattern_file else {
            return Ok(None);
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read pattern file {}", path.display()))?;
        let pattern = Pattern::parse(&content)
            .with_context(|| format!("invalid pattern file {}", path.display()))?;
        Ok(Some(pattern))
    }
}

/// the terminal belongs to the view, so logs only go to a file unless headless.
fn init_logging(args: &CliArgs) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Some(path) = &args.log_file {
        let file = fs::File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.headless.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn populate(
    handle: &SimHandle,
    grid: &Grid,
    pattern: Option<Pattern>,
    config: &Config,
) -> Result<()> {
    match pattern {
        Some(pattern) => {
            let origin = pattern.centered_in(grid)?;
            handle.stamp(pattern, origin)?;
        }
        None => {
            handle.seed(config.population_size, config.density)?;
        }
    }
    Ok(())
}

fn run_headless(handle: &SimHandle, generations: u64) -> Result<()> {
    for _ in 0..generations {
        handle.step()?;
    }
    let snapshot = handle.snapshot()?;
    info!(
        generation = snapshot.grid.generation(),
        population = snapshot.grid.population(),
        cycle_detected = snapshot.cycle_detected,
        "headless run completed"
    );
    println!(
        "generation {} population {}",
        snapshot.grid.generation(),
        snapshot.grid.population()
    );
    Ok(())
}

pub fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(&args)?;

    let config = args.config();
    let grid = Grid::new(config.rows, config.cols).context("invalid grid size")?;
    let pattern = args.pattern()?;
    info!(rows = config.rows, cols = config.cols, "starting");

    let simulation = Sim::spawn(grid.clone(), config.clone());
    let handle = simulation.handle();

    let outcome = match args.headless {
        Some(generations) => populate(&handle, &grid, pattern, &config)
            .and_then(|()| run_headless(&handle, generations)),
        None => {
            // the interactive view starts on an empty grid unless a pattern is given.
            let placed = match pattern {
                Some(pattern) => populate(&handle, &grid, Some(pattern), &config),
                None => Ok(()),
            };
            placed.and_then(|()| {
                View::spawn(handle.clone(), config.density, config.population_size).join()
            })
        }
    };

    handle.shutdown().ok();
    simulation
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    outcome
}
