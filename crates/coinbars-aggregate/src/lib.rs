//! OHLCV aggregation for the coinbars market-data engine.
//!
//! This crate provides tick-to-bar and bar-to-bar aggregation:
//!
//! - [`aggregate`] - Batch aggregation of an ordered sequence
//! - [`BarAggregator`] - Streaming aggregator for one interval
//! - [`MultiIntervalAggregator`] - Single-pass aggregation for many intervals

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod multi;

pub use aggregator::{BarAggregator, aggregate, aggregate_ticks};
pub use multi::MultiIntervalAggregator;
