//! Error types for the GMGN wallet profiler.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open source {path}: {source}")]
    SourceOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read source {path}: {source}")]
    SourceRead { path: PathBuf, source: csv::Error },

    #[error("Failed to open sink {path}: {source}")]
    SinkOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write to sink {path}: {source}")]
    SinkWrite { path: PathBuf, source: csv::Error },

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn sink_write(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Error::SinkWrite {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
