//! Error types for dataset persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing cached datasets.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a dataset file.
    #[error("Failed to parse dataset file '{path}': {source}")]
    ParseJson {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Failed to serialize a dataset.
    #[error("Failed to serialize dataset: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// A cache lock was poisoned by a panicking writer.
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
