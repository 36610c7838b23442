//! Profiler Core Library
//!
//! Shared types, configuration, and tabular storage for the GMGN wallet profiler.

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use error::{Error, Result};
