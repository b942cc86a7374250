//! Durable dataset cache and in-memory dataset registry for coinbars.
//!
//! This crate provides:
//!
//! - [`DatasetCache`] - Durable cache keyed by [`DatasetKey`](coinbars_types::DatasetKey)
//! - [`FileCache`] - JSON file per dataset under a data directory
//! - [`MemoryCache`] - In-memory cache
//! - [`DatasetRegistry`] - Resident datasets behind per-key async locks

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod error;
mod registry;

pub use cache::{DatasetCache, FileCache, MemoryCache};
pub use error::{CacheError, Result};
pub use registry::{DatasetRegistry, DatasetSlot};
