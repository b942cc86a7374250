//! HTTP client, retry policy and wire parsers for the coinbars market-data engine.
//!
//! This crate provides the network-facing pieces of the engine:
//!
//! - [`url`] - Exchange endpoint layout
//! - [`HttpClient`] - HTTP client with timeouts and retries
//! - [`RetryPolicy`] - Capped exponential backoff
//! - [`LineSource`] - Line-oriented GET abstraction
//! - [`fetch_history`] - Trade history download with cut-off
//! - [`parse_markets`] / [`parse_history_line`] / [`parse_feed_line`] - Wire parsers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod history;
mod parse;
pub mod protocol;
mod retry;
mod source;
pub mod url;

pub use client::{ClientConfig, FetchError, HttpClient};
pub use history::{HistoryBatch, fetch_history};
pub use parse::{ParseError, parse_history_line, parse_markets, tick_from_secs};
pub use protocol::{FeedMessage, FeedTick, parse_feed_line};
pub use retry::RetryPolicy;
pub use source::LineSource;
