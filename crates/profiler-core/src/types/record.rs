//! Per-token performance records collected from a wallet's PnL table.

use serde::{Deserialize, Serialize};

/// Opaque wallet identifier, used verbatim in the target URL.
pub type WalletAddress = String;

/// One rendered table row: trimmed cell text in document order.
pub type RawRow = Vec<String>;

/// A whole rendered table.
pub type RawTable = Vec<RawRow>;

/// Value written for a derived field whose source token is missing.
pub const PLACEHOLDER: &str = "--";

/// Performance of one token held or traded by a wallet.
///
/// All figures are kept as the text the page rendered; numeric extraction
/// happens in the aggregation pass. Field order is the stored column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenRecord {
    pub wallet: WalletAddress,
    pub name: String,
    pub unrealized_pnl: String,
    pub realized_profit: String,
    pub total_profit: String,
    pub balance_usd: String,
    pub position: String,
    pub buy_amount: String,
    pub buy_price: String,
    pub sell_amount: String,
    pub sell_price: String,
    pub total_buy_txn: String,
    pub total_sell_txn: String,
}

impl TokenRecord {
    /// Stored column names, in order.
    pub const HEADERS: [&'static str; 13] = [
        "wallet",
        "name",
        "unrealizedPnl",
        "realizedProfit",
        "totalProfit",
        "balanceUsd",
        "position",
        "buyAmount",
        "buyPrice",
        "sellAmount",
        "sellPrice",
        "totalBuyTxn",
        "totalSellTxn",
    ];

    /// Field values in stored column order.
    pub fn fields(&self) -> [&str; 13] {
        [
            &self.wallet,
            &self.name,
            &self.unrealized_pnl,
            &self.realized_profit,
            &self.total_profit,
            &self.balance_usd,
            &self.position,
            &self.buy_amount,
            &self.buy_price,
            &self.sell_amount,
            &self.sell_price,
            &self.total_buy_txn,
            &self.total_sell_txn,
        ]
    }

    /// Whether this row is one of the table's buy/sell action rows.
    pub fn is_action_header(&self) -> bool {
        is_action_header(&self.name)
    }
}

/// The PnL table interleaves "Buy"/"Sell" action rows with token rows.
/// Those names never denote a tradable token.
pub fn is_action_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("buy") || name.eq_ignore_ascii_case("sell")
}
