//! The collection loop: one page visit per wallet, records streamed to the store.

use crate::error::Result;
use crate::records::{BuiltRow, RecordBuilder};
use crate::scraper::TableSource;
use crate::throttle::Throttle;
use profiler_core::store::ResultStore;
use profiler_core::types::{RawRow, WalletAddress};
use tracing::{info, warn};

/// A wallet whose page could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFailure {
    pub address: WalletAddress,
    pub error: String,
}

/// Outcome of a collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub addresses: usize,
    pub succeeded: usize,
    pub failures: Vec<AddressFailure>,
    pub records_written: usize,
    pub action_rows_dropped: usize,
}

/// Drives a [`TableSource`] over the wallet list, strictly one address at a time.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    builder: RecordBuilder,
    throttle: Throttle,
    fail_fast: bool,
}

impl Collector {
    pub fn new(builder: RecordBuilder, throttle: Throttle) -> Self {
        Self {
            builder,
            throttle,
            fail_fast: false,
        }
    }

    /// Abort on the first address-scoped failure instead of moving on.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Collect every address in order.
    ///
    /// Store failures always abort: the aggregation pass relies on a complete file.
    pub async fn run<S, St>(
        &self,
        source: &S,
        addresses: &[WalletAddress],
        store: &mut St,
    ) -> Result<CollectionSummary>
    where
        S: TableSource + ?Sized,
        St: ResultStore + ?Sized,
    {
        let mut summary = CollectionSummary {
            addresses: addresses.len(),
            ..Default::default()
        };

        for (index, address) in addresses.iter().enumerate() {
            if index > 0 {
                self.throttle.pause().await;
            }

            match source.fetch_table(address).await {
                Ok(table) => {
                    let written = self.store_table(address, &table, store, &mut summary)?;
                    summary.succeeded += 1;
                    info!(
                        address = %address,
                        rows = table.len(),
                        records = written,
                        "Wallet collected ({}/{})",
                        index + 1,
                        addresses.len()
                    );
                }
                Err(e) if e.is_address_scoped() && !self.fail_fast => {
                    warn!(address = %address, error = %e, "Skipping wallet");
                    summary.failures.push(AddressFailure {
                        address: address.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    fn store_table<St: ResultStore + ?Sized>(
        &self,
        address: &str,
        table: &[RawRow],
        store: &mut St,
        summary: &mut CollectionSummary,
    ) -> Result<usize> {
        let mut written = 0;
        for built in self.builder.build_all(address, table) {
            match built {
                BuiltRow::Record(record) => {
                    store.append(&record)?;
                    written += 1;
                }
                BuiltRow::ActionHeader => summary.action_rows_dropped += 1,
                BuiltRow::Empty => {}
            }
        }
        summary.records_written += written;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::scraper::MockTableSource;
    use profiler_core::store::MemoryResultStore;
    use profiler_core::types::{RawTable, TokenRecord};
    use tokio_test::{assert_err, assert_ok};

    fn table(rows: &[&[&str]]) -> RawTable {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn wallet_table(token: &str) -> RawTable {
        table(&[
            &[],
            &["Buy", "", "", "", "", "", "", "", ""],
            &["Sell", "", "", "", "", "", "", "", ""],
            &[token, "+$500+20%", "-$100-5%", "$400", "$2000", "3", "$1$0.01", "$2$0.02", "10/5"],
        ])
    }

    fn addresses(list: &[&str]) -> Vec<WalletAddress> {
        list.iter().map(|a| a.to_string()).collect()
    }

    fn nav_timeout(address: &str) -> ScrapeError {
        ScrapeError::NavigationTimeout {
            address: address.to_string(),
            timeout_ms: 60_000,
        }
    }

    fn collector() -> Collector {
        Collector::new(RecordBuilder::default(), Throttle::none())
    }

    #[tokio::test]
    async fn test_action_rows_never_reach_the_store() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .times(2)
            .returning(|address| Ok(wallet_table(&format!("TOK-{}", address))));

        let mut store = MemoryResultStore::new();
        let summary = assert_ok!(
            collector()
                .run(&source, &addresses(&["w1", "w2"]), &mut store)
                .await
        );

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].wallet, "w1");
        assert_eq!(records[0].name, "TOK-w1");
        assert_eq!(records[1].wallet, "w2");
        assert!(records.iter().all(|r| !r.is_action_header()));

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.records_written, 2);
        assert_eq!(summary.action_rows_dropped, 4);
        assert!(summary.failures.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_isolated_to_its_address() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .times(3)
            .returning(|address| match address {
                "bad" => Err(nav_timeout(address)),
                other => Ok(wallet_table(other)),
            });

        let mut store = MemoryResultStore::new();
        let summary = assert_ok!(
            collector()
                .run(&source, &addresses(&["w1", "bad", "w3"]), &mut store)
                .await
        );

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].address, "bad");
        let wallets: Vec<_> = store.records().iter().map(|r| r.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["w1", "w3"]);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_remaining_batch() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .times(2)
            .returning(|address| match address {
                "bad" => Err(ScrapeError::ElementWaitTimeout {
                    address: address.to_string(),
                    selector: "table".to_string(),
                    timeout_ms: 60_000,
                }),
                other => Ok(wallet_table(other)),
            });

        let mut store = MemoryResultStore::new();
        let err = assert_err!(
            collector()
                .fail_fast(true)
                .run(&source, &addresses(&["w1", "bad", "w3"]), &mut store)
                .await
        );

        assert!(matches!(err, ScrapeError::ElementWaitTimeout { .. }));
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_errors_abort_even_without_fail_fast() {
        let mut source = MockTableSource::new();
        source.expect_fetch_table().times(1).returning(|_| {
            Err(ScrapeError::BrowserLaunch {
                message: "gone".to_string(),
            })
        });

        let mut store = MemoryResultStore::new();
        let result = collector()
            .run(&source, &addresses(&["w1", "w2"]), &mut store)
            .await;

        assert!(matches!(result, Err(ScrapeError::BrowserLaunch { .. })));
    }

    struct FailingStore;

    impl ResultStore for FailingStore {
        fn append(&mut self, _record: &TokenRecord) -> profiler_core::Result<()> {
            Err(profiler_core::Error::Config {
                message: "disk full".to_string(),
            })
        }

        fn appended(&self) -> usize {
            0
        }
    }

    #[tokio::test]
    async fn test_sink_failure_is_fatal() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .times(1)
            .returning(|address| Ok(wallet_table(address)));

        let result = collector()
            .run(&source, &addresses(&["w1", "w2"]), &mut FailingStore)
            .await;

        assert!(matches!(result, Err(ScrapeError::Store(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_runs_between_addresses_only() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .times(3)
            .returning(|address| Ok(wallet_table(address)));

        let collector = Collector::new(RecordBuilder::default(), Throttle::new(1_000, 1_000));
        let started = tokio::time::Instant::now();
        let mut store = MemoryResultStore::new();
        assert_ok!(
            collector
                .run(&source, &addresses(&["w1", "w2", "w3"]), &mut store)
                .await
        );

        let elapsed = started.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(2_000));
        assert!(elapsed < std::time::Duration::from_millis(3_000));
    }

    #[tokio::test]
    async fn test_empty_address_list() {
        let source = MockTableSource::new();
        let mut store = MemoryResultStore::new();

        let summary = assert_ok!(collector().run(&source, &[], &mut store).await);
        assert_eq!(summary, CollectionSummary::default());
    }
}
