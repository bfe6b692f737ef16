//! Run one dispatch scenario and print the outcome.
//!
//! Run with: cargo run -p dispatch_sim -- --seed 123

use std::path::PathBuf;

use clap::Parser;
use dispatch_core::scenario::run_scenario;
use dispatch_core::DispatchConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "dispatch_sim",
    about = "Simulate ride requests against a small driver fleet"
)]
struct Args {
    /// TOML file with a full or partial configuration; flags override it
    #[arg(long, env = "DISPATCH_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "DISPATCH_FLEET_SIZE")]
    fleet_size: Option<usize>,
    #[arg(long, env = "DISPATCH_REQUEST_COUNT")]
    request_count: Option<usize>,
    #[arg(long, env = "DISPATCH_QUEUE_CAPACITY")]
    queue_capacity: Option<usize>,
    /// Delay between consecutive requests, in milliseconds
    #[arg(long, env = "DISPATCH_INTER_ARRIVAL_MS")]
    inter_arrival_ms: Option<u64>,
    /// Shortest trip, in time units
    #[arg(long, env = "DISPATCH_TRIP_MIN_UNITS")]
    trip_min_units: Option<u64>,
    /// Exclusive upper bound on trip length, in time units
    #[arg(long, env = "DISPATCH_TRIP_MAX_UNITS")]
    trip_max_units: Option<u64>,
    #[arg(long, env = "DISPATCH_TIME_UNIT_MS")]
    time_unit_ms: Option<u64>,
    #[arg(long, env = "DISPATCH_GRID_EXTENT")]
    grid_extent: Option<i32>,
    #[arg(long, env = "DISPATCH_SEED")]
    seed: Option<u64>,
    /// Emit logs as JSON lines
    #[arg(long, env = "DISPATCH_LOG_JSON")]
    json: bool,
}

impl Args {
    fn into_config(self) -> Result<DispatchConfig, dispatch_core::DispatchError> {
        let mut config = match &self.config {
            Some(path) => DispatchConfig::parse_toml_file(path)?,
            None => DispatchConfig::default(),
        };
        if let Some(value) = self.fleet_size {
            config.fleet_size = value;
        }
        if let Some(value) = self.request_count {
            config.request_count = value;
        }
        if let Some(value) = self.queue_capacity {
            config.queue_capacity = value;
        }
        if let Some(value) = self.inter_arrival_ms {
            config.inter_arrival_ms = value;
        }
        if let Some(value) = self.trip_min_units {
            config.trip_min_units = value;
        }
        if let Some(value) = self.trip_max_units {
            config.trip_max_units = value;
        }
        if let Some(value) = self.time_unit_ms {
            config.time_unit_ms = value;
        }
        if let Some(value) = self.grid_extent {
            config.grid_extent = value;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.json);

    let config = args.into_config()?;
    info!(?config, "starting dispatch run");

    let report = run_scenario(&config).await?;

    println!("--- Dispatch run ({} drivers, {} requests) ---", config.fleet_size, config.request_count);
    println!("Assigned and completed: {}", report.completed.len());
    println!("Dropped (no driver available): {}", report.dropped.len());
    if !report.failures.is_empty() {
        println!("Failed trips: {}", report.failures.len());
    }
    println!("\nFinal fleet:");
    for driver in &report.fleet {
        println!(
            "  driver={}  location={}  available={}",
            driver.id, driver.location, driver.available
        );
    }
    Ok(())
}
