//! Profile Aggregator binary.

use anyhow::{Context, Result};
use clap::Parser;
use profiler_core::config::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter collected token records by profitability and summarise symbols per wallet.
#[derive(Debug, Parser)]
#[command(name = "profile-aggregator", version)]
struct Args {
    /// Config file (defaults to ./gmgn-profiler.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Records written by page-collector
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    filtered: Option<PathBuf>,

    #[arg(long)]
    summary: Option<PathBuf>,

    /// Minimum realized or unrealized cash amount (USD)
    #[arg(long)]
    min_cash: Option<f64>,

    /// Minimum realized or unrealized ROI (percent)
    #[arg(long)]
    min_roi: Option<f64>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let aggregator = &mut config.aggregator;

    if let Some(path) = &args.input {
        aggregator.input_path = path.clone();
    }
    if let Some(path) = &args.filtered {
        aggregator.filtered_path = path.clone();
    }
    if let Some(path) = &args.summary {
        aggregator.summary_path = path.clone();
    }
    if let Some(amount) = args.min_cash {
        aggregator.min_cash_amount = amount;
    }
    if let Some(roi) = args.min_roi {
        aggregator.min_roi = roi;
    }

    aggregator.validate().context("Invalid aggregator configuration")?;
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        input = %config.aggregator.input_path.display(),
        min_cash = config.aggregator.min_cash_amount,
        min_roi = config.aggregator.min_roi,
        "Starting Profile Aggregator"
    );

    profile_aggregator::run(&config.aggregator)?;

    info!(
        filtered = %config.aggregator.filtered_path.display(),
        summary = %config.aggregator.summary_path.display(),
        "Results written"
    );
    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "profile_aggregator=info,profiler_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("Aggregation failed: {:#}", e);
        std::process::exit(1);
    }
}
