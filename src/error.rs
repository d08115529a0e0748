//! Error types
//!
//! The synchronization core (normalize, tree, detect, sync) has no failure
//! modes of its own; errors only surface at the edges where configuration,
//! log files and recorded snapshots are read.

use thiserror::Error;

/// Errors raised by configuration, logging and the replay tooling
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid snapshot on line {line}: {source}")]
    InvalidSnapshot {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid file map: {0}")]
    InvalidFileMap(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
