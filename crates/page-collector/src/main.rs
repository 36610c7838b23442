//! Page Collector binary.

use anyhow::{Context, Result};
use clap::Parser;
use profiler_core::config::Config;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Collect per-token PnL tables for a list of wallets.
#[derive(Debug, Parser)]
#[command(name = "page-collector", version)]
struct Args {
    /// Config file (defaults to ./gmgn-profiler.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input file with a `wallet` column
    #[arg(long)]
    wallets: Option<PathBuf>,

    /// Output file for collected records
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Navigation and table-wait timeout
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long)]
    delay_min_ms: Option<u64>,

    #[arg(long)]
    delay_max_ms: Option<u64>,

    /// Stop at the first wallet whose page fails to load
    #[arg(long)]
    fail_fast: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let collector = &mut config.collector;

    if let Some(path) = &args.wallets {
        collector.wallets_path = path.clone();
    }
    if let Some(path) = &args.output {
        collector.output_path = path.clone();
    }
    if args.headed {
        collector.headless = false;
    }
    if let Some(ms) = args.timeout_ms {
        collector.timeout_ms = ms;
    }
    if let Some(ms) = args.delay_min_ms {
        collector.delay_min_ms = ms;
    }
    if let Some(ms) = args.delay_max_ms {
        collector.delay_max_ms = ms;
    }
    if args.fail_fast {
        collector.fail_fast = true;
    }

    collector.validate().context("Invalid collector configuration")?;
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        wallets = %config.collector.wallets_path.display(),
        output = %config.collector.output_path.display(),
        "Starting Page Collector"
    );

    let summary = page_collector::run(&config.collector).await?;

    for failure in &summary.failures {
        warn!(address = %failure.address, error = %failure.error, "Wallet not collected");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "page_collector=info,profiler_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Args::parse()).await {
        error!("Collection aborted: {:#}", e);
        std::process::exit(1);
    }
}
