//! Output formatters for coinbars bar datasets.
//!
//! Every bar is written as a [`BarRecord`] tagged with its dataset:
//!
//! - [`CsvFormatter`] - one row per bar
//! - [`JsonFormatter`] - one document, or NDJSON

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinbars/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;
mod record;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat, write_dataset};
pub use json::{JsonFormatter, JsonStyle};
pub use record::BarRecord;
