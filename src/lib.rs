//! GMGN Profiler: wallet PnL collection and profitability aggregation
//!
//! This is the root crate that provides benchmark and integration-test access
//! to the pipeline crates. For actual functionality, use the individual
//! crates directly:
//!
//! - `profiler-core`: Token records, tabular storage, configuration
//! - `page-collector`: Browser session, page scraping, record building
//! - `profile-aggregator`: Symbol/profit extraction, thresholds, wallet summaries

pub use page_collector as collector;
pub use profile_aggregator as aggregator;
pub use profiler_core as core;
