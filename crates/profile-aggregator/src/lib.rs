//! Profile Aggregator
//!
//! Second pipeline stage: reads the collected token records, extracts
//! symbols and profit figures, keeps the records that clear the
//! profitability thresholds and groups their symbols per wallet.

pub mod aggregator;
pub mod extract;
pub mod summary;
pub mod thresholds;

pub use aggregator::{
    Aggregation, AggregationStats, ProfileAggregator, QualifiedRecord, FILTERED_HEADERS,
    SUMMARY_HEADERS,
};
pub use extract::{extract_profit, extract_symbol, ProfitFigure};
pub use summary::{SummaryBook, WalletSummary};
pub use thresholds::Thresholds;

use profiler_core::config::AggregatorConfig;
use profiler_core::store::{read_records, write_table};
use profiler_core::types::TokenRecord;
use profiler_core::Result;
use tracing::info;

/// Aggregate the configured input file and write both outputs.
///
/// Outputs are only written once the whole input has been read.
pub fn run(config: &AggregatorConfig) -> Result<AggregationStats> {
    let records: Vec<TokenRecord> = read_records(&config.input_path)?;
    let aggregation = ProfileAggregator::new(Thresholds::from(config)).aggregate(&records);

    write_table(
        &config.filtered_path,
        &FILTERED_HEADERS,
        aggregation.qualified.iter().map(QualifiedRecord::to_row),
    )?;
    write_table(
        &config.summary_path,
        &SUMMARY_HEADERS,
        aggregation.summaries.iter().map(WalletSummary::to_row),
    )?;

    let stats = aggregation.stats;
    info!(
        input = %config.input_path.display(),
        records = stats.records,
        excluded = stats.excluded,
        qualified = stats.qualified,
        wallets = stats.wallets,
        "Aggregation finished"
    );
    Ok(stats)
}
