//! Network-idle detection for a page.
//!
//! A page counts as idle once no more than `max_inflight` requests have been
//! outstanding for a continuous `quiet` period (two requests for 500 ms by
//! default). Long-polling and analytics beacons never settle to zero, so a
//! small allowance is kept.

use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// When a page is considered settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleRule {
    pub max_inflight: usize,
    pub quiet: Duration,
}

impl Default for IdleRule {
    fn default() -> Self {
        Self {
            max_inflight: 2,
            quiet: Duration::from_millis(500),
        }
    }
}

/// Outstanding request bookkeeping.
#[derive(Debug)]
pub struct InflightTracker {
    rule: IdleRule,
    inflight: HashSet<String>,
    /// Start of the current stretch at or below `max_inflight`, if in one.
    calm_since: Option<Instant>,
}

impl InflightTracker {
    pub fn new(rule: IdleRule, now: Instant) -> Self {
        Self {
            rule,
            inflight: HashSet::new(),
            calm_since: Some(now),
        }
    }

    /// Redirects reuse the request id, so a repeated id is not counted twice.
    pub fn request_started(&mut self, request_id: String, now: Instant) {
        self.inflight.insert(request_id);
        self.refresh(now);
    }

    pub fn request_ended(&mut self, request_id: &str, now: Instant) {
        self.inflight.remove(request_id);
        self.refresh(now);
    }

    pub fn inflight(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_idle(&self, now: Instant) -> bool {
        self.calm_since
            .map(|since| now.duration_since(since) >= self.rule.quiet)
            .unwrap_or(false)
    }

    fn refresh(&mut self, now: Instant) {
        if self.inflight.len() > self.rule.max_inflight {
            self.calm_since = None;
        } else if self.calm_since.is_none() {
            self.calm_since = Some(now);
        }
    }
}

/// Follows a page's network events until dropped.
pub struct NetworkIdleWatcher {
    tracker: Arc<Mutex<InflightTracker>>,
    listeners: Vec<JoinHandle<()>>,
}

impl NetworkIdleWatcher {
    /// Subscribe to the page's request lifecycle. Attach before navigating.
    pub async fn attach(page: &Page, rule: IdleRule) -> Result<Self, CdpError> {
        let tracker = Arc::new(Mutex::new(InflightTracker::new(rule, Instant::now())));

        let mut started = page.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = page.event_listener::<EventLoadingFailed>().await?;

        let on_start = Arc::clone(&tracker);
        let on_finish = Arc::clone(&tracker);
        let on_fail = Arc::clone(&tracker);

        let listeners = vec![
            tokio::spawn(async move {
                while let Some(event) = started.next().await {
                    on_start
                        .lock()
                        .await
                        .request_started(event.request_id.inner().clone(), Instant::now());
                }
            }),
            tokio::spawn(async move {
                while let Some(event) = finished.next().await {
                    on_finish
                        .lock()
                        .await
                        .request_ended(event.request_id.inner(), Instant::now());
                }
            }),
            tokio::spawn(async move {
                while let Some(event) = failed.next().await {
                    on_fail
                        .lock()
                        .await
                        .request_ended(event.request_id.inner(), Instant::now());
                }
            }),
        ];

        Ok(Self { tracker, listeners })
    }

    /// Resolve once the page is idle. Unbounded; callers apply their own timeout.
    pub async fn wait_for_idle(&self) {
        loop {
            if self.tracker.lock().await.is_idle(Instant::now()) {
                return;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Drop for NetworkIdleWatcher {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}
