//! Bitcoin market-data ingestion engine: live ticks to OHLCV bar datasets.
//!
//! This is a facade crate that re-exports functionality from the coinbars
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use coinbars_lib::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::from_config(EngineConfig::default())?;
//!     provider.initialize().await?;
//!
//!     let dataset = provider.fetch_data("bitstampUSD", Interval::Minute1).await?;
//!     println!("{} bars", dataset.map_or(0, |d| d.len()));
//!
//!     loop {
//!         for bar in provider.last_bars("bitstampUSD", Interval::Minute1).await {
//!             println!("{bar:?}");
//!         }
//!         tokio::time::sleep(Provider::REFRESH_INTERVAL).await;
//!     }
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use coinbars_types::*;

// Re-export aggregation
pub use coinbars_aggregate::{BarAggregator, MultiIntervalAggregator, aggregate, aggregate_ticks};

// Re-export the engine
#[cfg(feature = "engine")]
pub use coinbars_engine::{
    BackfillSummary, EngineConfig, EngineError, EngineState, FeedConfig, FeedError, FeedState,
    LiveFeed, LiveFeedHandle, Provider, Reconciler, SymbolDirectory, SymbolMatch,
};

#[cfg(feature = "engine")]
pub use coinbars_fetch::{ClientConfig, FetchError, HttpClient, LineSource, RetryPolicy};

#[cfg(feature = "engine")]
pub use coinbars_store::{CacheError, DatasetCache, DatasetRegistry, FileCache, MemoryCache};

// Re-export formatters
#[cfg(feature = "format")]
pub use coinbars_format::{
    BarRecord, CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
    write_dataset,
};

/// Prelude module for convenient imports.
///
/// ```
/// use coinbars_lib::prelude::*;
/// ```
pub mod prelude {
    pub use coinbars_types::{Bar, Dataset, DatasetKey, Interval, Symbol, Tick};

    pub use coinbars_aggregate::{BarAggregator, aggregate};

    #[cfg(feature = "engine")]
    pub use coinbars_engine::{EngineConfig, EngineError, FeedConfig, Provider};

    #[cfg(feature = "engine")]
    pub use coinbars_fetch::{ClientConfig, RetryPolicy};

    #[cfg(feature = "engine")]
    pub use coinbars_store::{DatasetCache, FileCache, MemoryCache};

    #[cfg(feature = "format")]
    pub use coinbars_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
