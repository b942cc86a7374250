//! Core types for the coinbars market-data engine.
//!
//! This crate provides the fundamental data structures used throughout coinbars:
//!
//! - [`Tick`] - A single trade with timestamp, price and volume
//! - [`Bar`] - An OHLCV bar for one time bucket
//! - [`Interval`] - The eight supported bar widths
//! - [`Symbol`] / [`DatasetKey`] - Market identifiers and dataset keys
//! - [`Dataset`] - Time-ascending bar sequence with an open last bar

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod dataset;
mod error;
mod interval;
mod symbol;
mod tick;

pub use bar::Bar;
pub use dataset::Dataset;
pub use error::DatasetError;
pub use interval::{Interval, IntervalParseError};
pub use symbol::{DatasetKey, Symbol};
pub use tick::Tick;
