//! Live feed, history backfill and dataset reconciliation for coinbars.
//!
//! This crate provides the engine that keeps bar datasets current:
//!
//! - [`SymbolDirectory`] - Case-insensitive index of exchange markets
//! - [`LiveFeed`] - Persistent tick feed consumer with reconnects
//! - [`backfill()`] - Full-history download into every interval
//! - [`Reconciler`] - Merges new trades into cached datasets
//! - [`Provider`] - Facade over the whole engine
//! - [`EngineConfig`] / [`FeedConfig`] - Engine settings

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod backfill;
mod config;
mod directory;
mod error;
mod feed;
mod provider;
mod reconcile;
mod state;

#[cfg(test)]
mod testing;

pub use backfill::{BackfillSummary, backfill, backfill_locked};
pub use config::{EngineConfig, FeedConfig};
pub use directory::{SymbolDirectory, SymbolMatch};
pub use error::{EngineError, FeedError, Result};
pub use feed::{FeedState, LiveFeed, LiveFeedHandle, TickOutcome, apply_tick};
pub use provider::Provider;
pub use reconcile::Reconciler;
pub use state::{EngineState, Watermarks};
