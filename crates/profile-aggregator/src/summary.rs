//! Per-wallet sets of qualifying symbols.

use profiler_core::types::WalletAddress;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Distinct symbols that qualified for one wallet, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSummary {
    pub wallet: WalletAddress,
    symbols: Vec<String>,
    seen: HashSet<String>,
}

impl WalletSummary {
    pub fn new(wallet: impl Into<WalletAddress>) -> Self {
        Self {
            wallet: wallet.into(),
            symbols: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add a symbol; returns false if it was already present.
    pub fn insert(&mut self, symbol: &str) -> bool {
        if !self.seen.insert(symbol.to_string()) {
            return false;
        }
        self.symbols.push(symbol.to_string());
        true
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Output row: wallet and `[A B ...]`.
    pub fn to_row(&self) -> [String; 2] {
        [self.wallet.clone(), self.to_string()]
    }
}

/// Formats the symbol set as space-separated names inside brackets.
impl fmt::Display for WalletSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.symbols.join(" "))
    }
}

/// Summaries for every wallet with at least one qualifying record.
///
/// A wallet's summary is created on its first qualifying record; iteration
/// follows that order.
#[derive(Debug, Default)]
pub struct SummaryBook {
    summaries: Vec<WalletSummary>,
    index: HashMap<WalletAddress, usize>,
}

impl SummaryBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a qualifying symbol for `wallet`.
    pub fn add(&mut self, wallet: &str, symbol: &str) {
        let slot = match self.index.get(wallet) {
            Some(&slot) => slot,
            None => {
                self.summaries.push(WalletSummary::new(wallet));
                self.index
                    .insert(wallet.to_string(), self.summaries.len() - 1);
                self.summaries.len() - 1
            }
        };
        self.summaries[slot].insert(symbol);
    }

    pub fn get(&self, wallet: &str) -> Option<&WalletSummary> {
        self.index.get(wallet).map(|&slot| &self.summaries[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &WalletSummary> {
        self.summaries.iter()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
