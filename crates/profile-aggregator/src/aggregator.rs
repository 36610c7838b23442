//! Filtering and per-wallet aggregation of collected token records.

use crate::extract::{extract_profit, extract_symbol, ProfitFigure};
use crate::summary::SummaryBook;
use crate::thresholds::Thresholds;
use profiler_core::types::{TokenRecord, WalletAddress};
use tracing::{debug, trace};

/// Column names of the filtered output.
pub const FILTERED_HEADERS: [&str; 6] = [
    "wallet",
    "symbol",
    "realizedCashAmount",
    "realizedROI",
    "unrealizedCashAmount",
    "unrealizedROI",
];

/// Column names of the summary output.
pub const SUMMARY_HEADERS: [&str; 2] = ["wallet", "concatenated_symbols"];

/// A record that cleared the thresholds, with its extracted figures.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRecord {
    pub wallet: WalletAddress,
    pub symbol: String,
    pub realized: ProfitFigure,
    pub unrealized: ProfitFigure,
}

impl QualifiedRecord {
    /// Output row in `FILTERED_HEADERS` order.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.wallet.clone(),
            self.symbol.clone(),
            format_figure(self.realized.cash_amount()),
            format_figure(self.realized.roi()),
            format_figure(self.unrealized.cash_amount()),
            format_figure(self.unrealized.roi()),
        ]
    }
}

/// Shortest decimal form; NaN is written as `NaN`, infinities as
/// `Infinity`/`-Infinity` and negative zero as `0`.
pub fn format_figure(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

/// Counters for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub records: usize,
    /// Buy/sell section header rows skipped.
    pub excluded: usize,
    pub qualified: usize,
    pub wallets: usize,
}

/// Result of an aggregation pass.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub qualified: Vec<QualifiedRecord>,
    pub summaries: SummaryBook,
    pub stats: AggregationStats,
}

/// Applies extraction and thresholds to stored records.
#[derive(Debug, Clone, Default)]
pub struct ProfileAggregator {
    thresholds: Thresholds,
}

impl ProfileAggregator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Extract figures from one record and check it against the thresholds.
    ///
    /// Returns `None` for buy/sell header rows and records that fall short.
    pub fn evaluate(&self, record: &TokenRecord) -> Option<QualifiedRecord> {
        if record.is_action_header() {
            return None;
        }

        let realized = extract_profit(&record.realized_profit);
        let unrealized = extract_profit(&record.unrealized_pnl);
        if !self.thresholds.qualifies(&realized, &unrealized) {
            trace!(wallet = %record.wallet, name = %record.name, "Record below thresholds");
            return None;
        }

        Some(QualifiedRecord {
            wallet: record.wallet.clone(),
            symbol: extract_symbol(&record.name),
            realized,
            unrealized,
        })
    }

    /// Run every record through `evaluate`, collecting qualifying rows and
    /// per-wallet symbol sets in input order.
    pub fn aggregate<'a, I>(&self, records: I) -> Aggregation
    where
        I: IntoIterator<Item = &'a TokenRecord>,
    {
        let mut aggregation = Aggregation::default();

        for record in records {
            aggregation.stats.records += 1;
            if record.is_action_header() {
                aggregation.stats.excluded += 1;
                continue;
            }

            if let Some(qualified) = self.evaluate(record) {
                aggregation
                    .summaries
                    .add(&qualified.wallet, &qualified.symbol);
                aggregation.qualified.push(qualified);
            }
        }

        aggregation.stats.qualified = aggregation.qualified.len();
        aggregation.stats.wallets = aggregation.summaries.len();
        debug!(
            records = aggregation.stats.records,
            qualified = aggregation.stats.qualified,
            wallets = aggregation.stats.wallets,
            "Aggregated records"
        );
        aggregation
    }
}
