//! Drive-times command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐    ┌──────────────┐    ┌─────────────────┐
//!   │  scheduler   │───▶│ orchestrator │───▶│ distance_matrix │───▶ routing API
//!   │ once/forever │    │ one stamp per│    │ fetch+validate  │
//!   └──────────────┘    │    round     │    └─────────────────┘
//!                       └──────┬───────┘
//!                              ▼
//!                       ┌──────────────┐    ┌─────────────────┐
//!                       │    store     │◀───│   reporting     │◀── browser / static site
//!                       │ append-only  │    │ api + exporter  │
//!                       └──────────────┘    └─────────────────┘
//! ```

use std::path::PathBuf;

use chrono::Datelike;
use clap::{Parser, Subcommand};

use drive_times::config::{self, AppConfig};
use drive_times::maintenance::{self, SeedOptions};
use drive_times::observability::{logging, metrics};
use drive_times::reporting;
use drive_times::store::ObservationStore;
use drive_times::{DistanceMatrixClient, Sampler, Scheduler};

#[derive(Parser)]
#[command(name = "drive-times")]
#[command(about = "Sample and report driving times from one origin", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample travel times on the configured interval
    Sample {
        /// Run a single round and exit
        #[arg(long)]
        once: bool,
    },
    /// Serve the JSON query API
    Serve,
    /// Write the static JSON bundle
    Export {
        /// Output directory (defaults to reporting.export_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Remove the output directory first
        #[arg(long)]
        clean: bool,
    },
    /// Insert a year of fake observations
    Seed {
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Delete the year's existing rows first
        #[arg(long)]
        clear: bool,
    },
    /// Delete every observation from a UTC year
    Purge {
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: i32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "drive-times starting");

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    match cli.command {
        Commands::Sample { once } => sample(&config, once).await?,
        Commands::Serve => reporting::serve(&config).await?,
        Commands::Export { out, clean } => {
            let out = out.unwrap_or_else(|| PathBuf::from(&config.reporting.export_dir));
            let offset = display_offset(&config)?;
            let store = ObservationStore::open_read_only(&config.store.path)?;
            let summary = reporting::export_static(&store, &out, offset, clean)?;
            store.close()?;
            tracing::info!(?summary, "Export finished");
        }
        Commands::Seed { year, seed, clear } => {
            let options = SeedOptions {
                year: year.unwrap_or_else(|| chrono::Utc::now().year()),
                seed,
                clear,
            };
            let offset = display_offset(&config)?;
            let mut store = ObservationStore::open_ready(&config.store.path)?;
            maintenance::seed_store(
                &mut store,
                &config.sampling.origin,
                &config.sampling.destinations,
                &options,
                offset,
            )?;
            store.close()?;
        }
        Commands::Purge { year } => {
            let mut store = ObservationStore::open_ready(&config.store.path)?;
            maintenance::purge_year(&mut store, year)?;
            store.close()?;
        }
    }

    Ok(())
}

async fn sample(config: &AppConfig, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    config::validate_for_sampling(config).map_err(config::ConfigError::Validation)?;

    let client = DistanceMatrixClient::new(&config.api)?;
    let scheduler = Scheduler::new(Sampler::from_config(client, config), &config.sampling);

    if once {
        scheduler.run_once().await?;
        return Ok(());
    }

    match scheduler.run_forever().await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}

fn display_offset(config: &AppConfig) -> Result<chrono::FixedOffset, config::ConfigError> {
    config::parse_utc_offset(&config.reporting.utc_offset).ok_or_else(|| {
        config::ConfigError::Validation(vec![config::ValidationError::InvalidOffset(
            config.reporting.utc_offset.clone(),
        )])
    })
}
