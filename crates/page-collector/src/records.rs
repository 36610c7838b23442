//! Mapping of rendered table rows into token records.

use profiler_core::config::RowLayout;
use profiler_core::types::{is_action_header, RawRow, TokenRecord, PLACEHOLDER};

/// What a single rendered row turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltRow {
    Record(TokenRecord),
    /// A "Buy"/"Sell" action row.
    ActionHeader,
    /// A row without `td` cells (the table's header row).
    Empty,
}

/// Builds [`TokenRecord`]s from table rows using a fixed column layout.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    layout: RowLayout,
}

impl RecordBuilder {
    pub fn new(layout: RowLayout) -> Self {
        Self { layout }
    }

    /// Map one row for `wallet`.
    pub fn build(&self, wallet: &str, cells: &[String]) -> BuiltRow {
        if cells.is_empty() {
            return BuiltRow::Empty;
        }

        let layout = &self.layout;
        let cell = |index: usize| cells.get(index).map(String::as_str);
        let direct = |index: usize| cell(index).unwrap_or_default().to_string();

        let name = direct(layout.name);
        if is_action_header(&name) {
            return BuiltRow::ActionHeader;
        }

        let (buy_amount, buy_price) = split_amount_price(cell(layout.buy));
        let (sell_amount, sell_price) = split_amount_price(cell(layout.sell));
        let (total_buy_txn, total_sell_txn) = split_txn_counts(cell(layout.txns));

        BuiltRow::Record(TokenRecord {
            wallet: wallet.to_string(),
            name,
            unrealized_pnl: direct(layout.unrealized_pnl),
            realized_profit: direct(layout.realized_profit),
            total_profit: direct(layout.total_profit),
            balance_usd: direct(layout.balance_usd),
            position: direct(layout.position),
            buy_amount,
            buy_price,
            sell_amount,
            sell_price,
            total_buy_txn,
            total_sell_txn,
        })
    }

    /// Map every row of a table, keeping only token records.
    pub fn build_all<'a>(
        &'a self,
        wallet: &'a str,
        table: &'a [RawRow],
    ) -> impl Iterator<Item = BuiltRow> + 'a {
        table.iter().map(move |row| self.build(wallet, row))
    }
}

/// `"$1$0.01"` splits on `$` into `["", "1", "0.01"]`: amount and price are
/// the second and third tokens.
fn split_amount_price(cell: Option<&str>) -> (String, String) {
    let mut tokens = cell.map(|c| c.split('$')).into_iter().flatten().skip(1);
    (token_or_placeholder(tokens.next()), token_or_placeholder(tokens.next()))
}

/// `"10/5"` is buy count then sell count.
fn split_txn_counts(cell: Option<&str>) -> (String, String) {
    let mut tokens = cell.map(|c| c.split('/')).into_iter().flatten();
    (token_or_placeholder(tokens.next()), token_or_placeholder(tokens.next()))
}

fn token_or_placeholder(token: Option<&str>) -> String {
    token.unwrap_or(PLACEHOLDER).to_string()
}
