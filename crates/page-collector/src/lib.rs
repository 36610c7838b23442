//! Page Collector
//!
//! Visits each wallet's PnL page in a single stealth-configured browser,
//! turns the rendered table into token records, and streams them to the
//! result store.

pub mod addresses;
pub mod browser;
pub mod collector;
pub mod error;
pub mod network_idle;
pub mod records;
pub mod scraper;
pub mod throttle;

pub use addresses::load_addresses;
pub use browser::{BrowserSession, BrowserSettings};
pub use collector::{AddressFailure, CollectionSummary, Collector};
pub use error::{Result, ScrapeError};
pub use records::{BuiltRow, RecordBuilder};
pub use scraper::{target_url, PageScraper, TableSource};
pub use throttle::Throttle;

use profiler_core::config::CollectorConfig;
use profiler_core::store::CsvResultStore;
use std::time::Duration;
use tracing::info;

/// Run a full collection pass as configured.
///
/// The wallet list is read before the browser starts and the output file is
/// only recreated once the browser is up; the browser is shut down whether
/// or not collection succeeds.
pub async fn run(config: &CollectorConfig) -> Result<CollectionSummary> {
    let base_url = config.parsed_base_url()?;
    let addresses = load_addresses(&config.wallets_path)?;

    let collector = Collector::new(
        RecordBuilder::new(config.layout.clone()),
        Throttle::new(config.delay_min_ms, config.delay_max_ms),
    )
    .fail_fast(config.fail_fast);

    let session = BrowserSession::launch(&BrowserSettings::from(config)).await?;
    let mut store = match CsvResultStore::create(&config.output_path) {
        Ok(store) => store,
        Err(e) => {
            session.shutdown().await;
            return Err(e.into());
        }
    };
    let scraper = PageScraper::new(
        &session,
        base_url,
        Duration::from_millis(config.timeout_ms),
    );

    let outcome = collector.run(&scraper, &addresses, &mut store).await;
    drop(scraper);
    session.shutdown().await;

    let summary = outcome?;
    info!(
        output = %store.path().display(),
        addresses = summary.addresses,
        succeeded = summary.succeeded,
        failed = summary.failures.len(),
        records = summary.records_written,
        "Collection finished"
    );
    Ok(summary)
}
