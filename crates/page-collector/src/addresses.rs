//! Wallet address list loading.

use profiler_core::store::{self, TabularRow};
use profiler_core::types::WalletAddress;
use std::path::Path;
use tracing::{info, warn};

/// Column holding the wallet address in the input file.
pub const WALLET_COLUMN: &str = "wallet";

/// Load the addresses to collect, in file order.
///
/// Fails if the file cannot be opened or read to the end; no partial list is returned.
pub fn load_addresses(path: &Path) -> profiler_core::Result<Vec<WalletAddress>> {
    let rows = store::load_rows(path)?;
    let total = rows.len();
    let addresses = addresses_from_rows(&rows);

    if total > 0 && addresses.is_empty() {
        warn!(
            path = %path.display(),
            "No `{}` values found in {} rows",
            WALLET_COLUMN,
            total
        );
    }

    info!(
        path = %path.display(),
        addresses = addresses.len(),
        skipped = total - addresses.len(),
        "Wallet list loaded"
    );
    Ok(addresses)
}

/// Pick the wallet column out of each row.
///
/// Rows without the column, or with a blank value, are skipped.
pub fn addresses_from_rows(rows: &[TabularRow]) -> Vec<WalletAddress> {
    rows.iter()
        .filter_map(|row| row.get(WALLET_COLUMN))
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(String::from)
        .collect()
}
