//! Error types for the collection pass.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Browser launch failed: {message}")]
    BrowserLaunch { message: String },

    #[error("Navigation to {address} timed out after {timeout_ms} ms")]
    NavigationTimeout { address: String, timeout_ms: u64 },

    #[error("Waiting for `{selector}` on {address} timed out after {timeout_ms} ms")]
    ElementWaitTimeout {
        address: String,
        selector: String,
        timeout_ms: u64,
    },

    #[error("Browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("Unexpected table payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] profiler_core::Error),
}

impl ScrapeError {
    /// Failures confined to one address's page; the browser and the sink
    /// are still usable afterwards.
    pub fn is_address_scoped(&self) -> bool {
        matches!(
            self,
            ScrapeError::NavigationTimeout { .. }
                | ScrapeError::ElementWaitTimeout { .. }
                | ScrapeError::Cdp(_)
                | ScrapeError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_address_scoped() {
        let nav = ScrapeError::NavigationTimeout {
            address: "w1".to_string(),
            timeout_ms: 60_000,
        };
        let wait = ScrapeError::ElementWaitTimeout {
            address: "w1".to_string(),
            selector: "table".to_string(),
            timeout_ms: 60_000,
        };

        assert!(nav.is_address_scoped());
        assert!(wait.is_address_scoped());
        assert_eq!(
            nav.to_string(),
            "Navigation to w1 timed out after 60000 ms"
        );
    }

    #[test]
    fn test_launch_and_store_errors_are_fatal() {
        let launch = ScrapeError::BrowserLaunch {
            message: "no chrome".to_string(),
        };
        let store = ScrapeError::Store(profiler_core::Error::Config {
            message: "bad".to_string(),
        });

        assert!(!launch.is_address_scoped());
        assert!(!store.is_address_scoped());
    }
}
