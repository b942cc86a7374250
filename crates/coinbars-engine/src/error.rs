//! Error types for the engine.

use coinbars_fetch::{FetchError, ParseError};
use coinbars_store::CacheError;
use coinbars_types::DatasetError;
use thiserror::Error;

/// Errors returned by engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An HTTP fetch failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// An exchange response could not be parsed.
    #[error("Parse failed: {0}")]
    Parse(#[from] ParseError),

    /// The dataset cache failed.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// The symbol is not listed by the exchange.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// A dataset invariant was violated.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// The live feed failed.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// A blocking cache task panicked or was cancelled.
    #[error("Cache task failed: {0}")]
    Task(String),
}

/// Errors that stop the live feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// The feed server could not be reached within the reconnect policy.
    #[error("Failed to connect to '{addr}' after {attempts} attempts: {source}")]
    Connect {
        /// The feed address.
        addr: String,
        /// Number of connection attempts made.
        attempts: u32,
        /// The last I/O error.
        source: std::io::Error,
    },

    /// The feed task ended abnormally.
    #[error("Feed task failed: {0}")]
    Task(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
