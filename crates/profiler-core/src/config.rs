//! Configuration management for the GMGN wallet profiler.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `GMGN_`-prefixed environment variables (`GMGN_COLLECTOR__HEADLESS=false`).
//! Binaries apply command-line overrides on top and call [`Config::validate`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gmgn-profiler.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collector: CollectorConfig,
    pub aggregator: AggregatorConfig,
}

/// Stage 1: browser-driven collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Page URL prefix; the wallet address is appended as the last path segment.
    pub base_url: String,
    pub wallets_path: PathBuf,
    pub output_path: PathBuf,
    pub headless: bool,
    /// Bound on each of navigation and table wait.
    pub timeout_ms: u64,
    pub delay_min_ms: u64,
    pub delay_max_ms: u64,
    /// Abort the remaining batch on the first per-address failure.
    pub fail_fast: bool,
    /// URL patterns (`*` wildcards) the browser refuses to load.
    pub blocked_url_patterns: Vec<String>,
    pub chrome_executable: Option<PathBuf>,
    pub extra_args: Vec<String>,
    pub layout: RowLayout,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gmgn.ai/sol/address/".to_string(),
            wallets_path: PathBuf::from("wallets.csv"),
            output_path: PathBuf::from("result.csv"),
            headless: true,
            timeout_ms: 60_000,
            delay_min_ms: 1_000,
            delay_max_ms: 3_000,
            fail_fast: false,
            blocked_url_patterns: default_blocked_patterns(),
            chrome_executable: None,
            extra_args: Vec::new(),
            layout: RowLayout::default(),
        }
    }
}

fn default_blocked_patterns() -> Vec<String> {
    [
        "*doubleclick.net*",
        "*googlesyndication.com*",
        "*googleadservices.com*",
        "*google-analytics.com*",
        "*googletagmanager.com*",
        "*adservice.google.*",
        "*facebook.net*",
        "*connect.facebook.com*",
        "*hotjar.com*",
        "*segment.io*",
        "*mixpanel.com*",
        "*amplitude.com*",
        "*scorecardresearch.com*",
        "*adnxs.com*",
        "*taboola.com*",
        "*outbrain.com*",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Column positions of the wallet PnL table.
///
/// Only the positions are configurable; the split rules applied to the
/// buy, sell and transaction-count cells are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    pub name: usize,
    pub unrealized_pnl: usize,
    pub realized_profit: usize,
    pub total_profit: usize,
    pub balance_usd: usize,
    pub position: usize,
    /// `$amount$price`
    pub buy: usize,
    /// `$amount$price`
    pub sell: usize,
    /// `buys/sells`
    pub txns: usize,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            name: 0,
            unrealized_pnl: 1,
            realized_profit: 2,
            total_profit: 3,
            balance_usd: 4,
            position: 5,
            buy: 6,
            sell: 7,
            txns: 8,
        }
    }
}

/// Stage 2: extraction, filtering and aggregation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub input_path: PathBuf,
    pub filtered_path: PathBuf,
    pub summary_path: PathBuf,
    /// Strict lower bound on realized or unrealized cash profit.
    pub min_cash_amount: f64,
    /// Strict lower bound on realized or unrealized ROI percent.
    pub min_roi: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("result.csv"),
            filtered_path: PathBuf::from("processed_result.csv"),
            summary_path: PathBuf::from("summary_result.csv"),
            min_cash_amount: 1_000.0,
            min_roi: 100.0,
        }
    }
}

impl Config {
    /// Load configuration from `.env`, an optional config file, and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("GMGN")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("collector.blocked_url_patterns")
                    .with_list_parse_key("collector.extra_args")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Check cross-field constraints after all overrides are applied.
    pub fn validate(&self) -> Result<()> {
        self.collector.validate()?;
        self.aggregator.validate()
    }
}

impl CollectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::Config {
                message: "collector.timeout_ms must be greater than zero".to_string(),
            });
        }
        if self.delay_min_ms > self.delay_max_ms {
            return Err(Error::Config {
                message: format!(
                    "collector.delay_min_ms ({}) exceeds collector.delay_max_ms ({})",
                    self.delay_min_ms, self.delay_max_ms
                ),
            });
        }
        self.parsed_base_url()?;
        Ok(())
    }

    /// The base URL as an absolute URL that can carry path segments.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("collector.base_url is not a base URL: {}", self.base_url),
            });
        }
        Ok(url)
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_cash_amount.is_nan() || self.min_roi.is_nan() {
            return Err(Error::Config {
                message: "aggregator thresholds must be numbers".to_string(),
            });
        }
        Ok(())
    }
}
