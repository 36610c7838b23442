//! The shared, evasion-configured Chrome instance.

use crate::error::{Result, ScrapeError};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use profiler_core::config::CollectorConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Hides the `AutomationControlled` blink feature that sets `navigator.webdriver`.
const AUTOMATION_FLAG: &str = "--disable-blink-features=AutomationControlled";

/// Headroom over the page timeout so the scraper's own deadline fires first.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Browser launch options taken from the collector configuration.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Per-step page timeout; CDP requests are allowed slightly longer.
    pub timeout: Duration,
    pub chrome_executable: Option<std::path::PathBuf>,
    pub extra_args: Vec<String>,
    pub blocked_url_patterns: Vec<String>,
}

impl BrowserSettings {
    /// Deadline for a single CDP request such as `Page.navigate`.
    pub fn request_timeout(&self) -> Duration {
        self.timeout + REQUEST_TIMEOUT_MARGIN
    }
}

impl From<&CollectorConfig> for BrowserSettings {
    fn from(config: &CollectorConfig) -> Self {
        Self {
            headless: config.headless,
            timeout: Duration::from_millis(config.timeout_ms),
            chrome_executable: config.chrome_executable.clone(),
            extra_args: config.extra_args.clone(),
            blocked_url_patterns: config.blocked_url_patterns.clone(),
        }
    }
}

/// One browser for the whole run.
///
/// Pages are opened one at a time. Call [`BrowserSession::shutdown`] on every
/// exit path; dropping the session without it leaves the CDP handler task
/// to be torn down with the runtime.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    blocked_url_patterns: Vec<String>,
}

impl BrowserSession {
    /// Launch Chrome and start driving its DevTools connection.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg(AUTOMATION_FLAG)
            .window_size(1366, 768)
            .request_timeout(settings.request_timeout());

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let config = builder
            .build()
            .map_err(|message| ScrapeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| ScrapeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "Browser handler error");
                }
            }
        });

        info!(headless = settings.headless, "Browser launched");
        Ok(Self {
            browser,
            handler,
            blocked_url_patterns: settings.blocked_url_patterns.clone(),
        })
    }

    /// Open a blank page with stealth patches and request blocking applied.
    pub async fn open_page(&self) -> Result<Page> {
        let page = self.browser.new_page("about:blank").await?;

        if let Err(e) = self.prepare(&page).await {
            if let Err(close_err) = page.close().await {
                warn!(error = %close_err, "Failed to close page after setup error");
            }
            return Err(e);
        }

        Ok(page)
    }

    async fn prepare(&self, page: &Page) -> Result<()> {
        page.enable_stealth_mode().await?;

        if !self.blocked_url_patterns.is_empty() {
            page.execute(SetBlockedUrLsParams::new(self.blocked_url_patterns.clone()))
                .await?;
        }
        Ok(())
    }

    /// Close the browser and wait for the process to exit.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Waiting for browser exit failed");
        }
        self.handler.abort();
        info!("Browser closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_collector_config() {
        let config = CollectorConfig {
            headless: false,
            timeout_ms: 60_000,
            extra_args: vec!["--no-sandbox".to_string()],
            ..CollectorConfig::default()
        };

        let settings = BrowserSettings::from(&config);

        assert!(!settings.headless);
        assert_eq!(settings.timeout, Duration::from_millis(60_000));
        assert!(settings.request_timeout() > settings.timeout);
        assert_eq!(settings.extra_args, vec!["--no-sandbox"]);
        assert!(settings
            .blocked_url_patterns
            .iter()
            .any(|p| p.contains("doubleclick")));
    }
}
