//! Randomized pause between page visits.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Uniform random delay in `[min_ms, max_ms]`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    min_ms: u64,
    max_ms: u64,
}

impl Throttle {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    pub fn next_delay_with(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }

    /// Sleep for a freshly drawn delay.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "Throttling before next address");
        tokio::time::sleep(delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(1_000, 3_000)
    }
}
