//! Core types for the GMGN wallet profiler.

pub mod record;

pub use record::{is_action_header, RawRow, RawTable, TokenRecord, WalletAddress, PLACEHOLDER};
