//! Profitability thresholds a token record must clear to be kept.

use crate::extract::ProfitFigure;
use profiler_core::config::AggregatorConfig;

/// Minimum cash amount or ROI for a record to qualify.
///
/// A record qualifies when any one of its realized or unrealized figures
/// exceeds the matching threshold. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum cash amount in USD.
    pub min_cash_amount: f64,
    /// Minimum ROI in percent.
    pub min_roi: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_cash_amount: 1000.0,
            min_roi: 100.0,
        }
    }
}

impl Thresholds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_cash_amount(mut self, amount: f64) -> Self {
        self.min_cash_amount = amount;
        self
    }

    pub fn min_roi(mut self, roi: f64) -> Self {
        self.min_roi = roi;
        self
    }

    /// Whether the realized or unrealized figures clear either threshold.
    ///
    /// A NaN figure fails only its own comparison.
    pub fn qualifies(&self, realized: &ProfitFigure, unrealized: &ProfitFigure) -> bool {
        realized.cash_amount() > self.min_cash_amount
            || unrealized.cash_amount() > self.min_cash_amount
            || realized.roi() > self.min_roi
            || unrealized.roi() > self.min_roi
    }
}

impl From<&AggregatorConfig> for Thresholds {
    fn from(config: &AggregatorConfig) -> Self {
        Self::new()
            .min_cash_amount(config.min_cash_amount)
            .min_roi(config.min_roi)
    }
}
