//! Per-address page visits.

use crate::browser::BrowserSession;
use crate::error::{Result, ScrapeError};
use crate::network_idle::{IdleRule, NetworkIdleWatcher};
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use profiler_core::types::RawTable;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Element whose appearance marks the PnL table as rendered.
pub const TABLE_SELECTOR: &str = "table";

/// Every `tr` of every table, as trimmed `td` texts. Header rows (`th` only)
/// come back empty.
const TABLE_ROWS_SCRIPT: &str = r#"Array.from(document.querySelectorAll('table tr')).map(
    (row) => Array.from(row.querySelectorAll('td')).map((cell) => cell.innerText.trim())
)"#;

const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Source of a wallet's rendered PnL table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the table rows shown for `address`.
    async fn fetch_table(&self, address: &str) -> Result<RawTable>;
}

/// Page URL for a wallet: the address becomes the last path segment.
pub fn target_url(base: &Url, address: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(address);
    }
    url
}

/// Visits wallet pages in a shared [`BrowserSession`].
pub struct PageScraper<'a> {
    session: &'a BrowserSession,
    base_url: Url,
    timeout: Duration,
}

impl<'a> PageScraper<'a> {
    pub fn new(session: &'a BrowserSession, base_url: Url, timeout: Duration) -> Self {
        Self {
            session,
            base_url,
            timeout,
        }
    }

    async fn read_table(&self, page: &Page, address: &str, url: &Url) -> Result<RawTable> {
        let idle = NetworkIdleWatcher::attach(page, IdleRule::default()).await?;

        let navigation = async {
            page.goto(url.as_str())
                .await
                .map_err(|e| navigation_error(e, address, self.timeout))?;
            idle.wait_for_idle().await;
            Ok::<_, ScrapeError>(())
        };
        within_navigation(navigation, address, self.timeout).await?;
        drop(idle);
        info!(address, "Page loaded");

        let table_wait = async {
            wait_for_selector(page, TABLE_SELECTOR).await;
            Ok::<_, ScrapeError>(())
        };
        within_element_wait(table_wait, address, TABLE_SELECTOR, self.timeout).await?;
        info!(address, "Table loaded");

        let rows: RawTable = page.evaluate(TABLE_ROWS_SCRIPT).await?.into_value()?;
        Ok(rows)
    }
}

fn millis(timeout: Duration) -> u64 {
    timeout.as_millis() as u64
}

/// Run `step`, turning an elapsed `timeout` into `on_timeout()`.
async fn bounded<F, T>(
    step: F,
    timeout: Duration,
    on_timeout: impl FnOnce() -> ScrapeError,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, step)
        .await
        .map_err(|_| on_timeout())?
}

/// Bound the load phase of a page visit.
async fn within_navigation<F, T>(step: F, address: &str, timeout: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    bounded(step, timeout, || ScrapeError::NavigationTimeout {
        address: address.to_string(),
        timeout_ms: millis(timeout),
    })
    .await
}

/// Bound the wait for `selector` to appear.
async fn within_element_wait<F, T>(
    step: F,
    address: &str,
    selector: &str,
    timeout: Duration,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    bounded(step, timeout, || ScrapeError::ElementWaitTimeout {
        address: address.to_string(),
        selector: selector.to_string(),
        timeout_ms: millis(timeout),
    })
    .await
}

/// A request deadline hit inside the browser during `goto` is still a
/// navigation timeout.
fn navigation_error(error: CdpError, address: &str, timeout: Duration) -> ScrapeError {
    match error {
        CdpError::Timeout => ScrapeError::NavigationTimeout {
            address: address.to_string(),
            timeout_ms: millis(timeout),
        },
        other => ScrapeError::Cdp(other),
    }
}

#[async_trait]
impl TableSource for PageScraper<'_> {
    async fn fetch_table(&self, address: &str) -> Result<RawTable> {
        let url = target_url(&self.base_url, address);
        let page = self.session.open_page().await?;

        let outcome = self.read_table(&page, address, &url).await;

        if let Err(e) = page.close().await {
            warn!(address, error = %e, "Failed to close page");
        }
        outcome
    }
}

/// Poll until `selector` matches. Unbounded; callers apply their own timeout.
async fn wait_for_selector(page: &Page, selector: &str) {
    while page.find_element(selector).await.is_err() {
        tokio::time::sleep(SELECTOR_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_appends_address_segment() {
        let base = Url::parse("https://gmgn.ai/sol/address/").unwrap();
        let url = target_url(&base, "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");

        assert_eq!(
            url.as_str(),
            "https://gmgn.ai/sol/address/7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"
        );
    }

    #[test]
    fn test_target_url_without_trailing_slash() {
        let base = Url::parse("https://gmgn.ai/sol/address").unwrap();
        assert_eq!(
            target_url(&base, "abc").as_str(),
            "https://gmgn.ai/sol/address/abc"
        );
    }

    #[test]
    fn test_target_url_escapes_path_characters() {
        let base = Url::parse("https://gmgn.ai/sol/address/").unwrap();
        assert_eq!(
            target_url(&base, "a/b?c").as_str(),
            "https://gmgn.ai/sol/address/a%2Fb%3Fc"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_navigation_is_navigation_timeout() {
        let err = within_navigation(
            std::future::pending::<Result<()>>(),
            "w1",
            Duration::from_millis(60_000),
        )
        .await
        .unwrap_err();

        match err {
            ScrapeError::NavigationTimeout { address, timeout_ms } => {
                assert_eq!(address, "w1");
                assert_eq!(timeout_ms, 60_000);
            }
            other => panic!("expected navigation timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_table_is_element_wait_timeout() {
        let err = within_element_wait(
            std::future::pending::<Result<()>>(),
            "w1",
            TABLE_SELECTOR,
            Duration::from_millis(5_000),
        )
        .await
        .unwrap_err();

        match err {
            ScrapeError::ElementWaitTimeout {
                address,
                selector,
                timeout_ms,
            } => {
                assert_eq!(address, "w1");
                assert_eq!(selector, "table");
                assert_eq!(timeout_ms, 5_000);
            }
            other => panic!("expected element wait timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_step_keeps_its_own_error() {
        let step = async {
            Err::<(), _>(ScrapeError::BrowserLaunch {
                message: "gone".to_string(),
            })
        };
        let err = within_navigation(step, "w1", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::BrowserLaunch { .. }));

        let rows = within_element_wait(async { Ok(3) }, "w1", TABLE_SELECTOR, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(rows, 3);
    }

    #[test]
    fn test_browser_request_deadline_during_goto_is_navigation_timeout() {
        let err = navigation_error(CdpError::Timeout, "w1", Duration::from_millis(60_000));
        assert!(matches!(
            err,
            ScrapeError::NavigationTimeout {
                timeout_ms: 60_000,
                ..
            }
        ));

        let other = navigation_error(CdpError::NoResponse, "w1", Duration::from_millis(60_000));
        assert!(matches!(other, ScrapeError::Cdp(CdpError::NoResponse)));
    }

    #[tokio::test]
    async fn test_mock_source_returns_rows() {
        let mut source = MockTableSource::new();
        source
            .expect_fetch_table()
            .withf(|address| address.to_string() == "w1")
            .times(1)
            .returning(|_| Ok(vec![vec!["TOK".to_string()]]));

        let rows = source.fetch_table("w1").await.unwrap();
        assert_eq!(rows, vec![vec!["TOK".to_string()]]);
    }
}
