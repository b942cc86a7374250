//! Output format abstraction.

use coinbars_types::{Bar, DatasetKey};
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    Csv,
    /// One JSON document.
    Json,
    /// Newline-delimited JSON format.
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the bars of one dataset.
pub trait Formatter: Send + Sync {
    /// Writes `bars`, the tail of the dataset `key`, to `writer`.
    ///
    /// The last of `bars` is taken to be the dataset's open bar.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_dataset<W: Write + Send>(
        &self,
        key: &DatasetKey,
        bars: &[Bar],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

/// Writes the tail `bars` of dataset `key` in `format`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_dataset<W: Write + Send>(
    format: OutputFormat,
    key: &DatasetKey,
    bars: &[Bar],
    writer: W,
) -> Result<(), FormatError> {
    match format {
        OutputFormat::Csv => CsvFormatter::new().write_dataset(key, bars, writer),
        OutputFormat::Json => JsonFormatter::new().write_dataset(key, bars, writer),
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_dataset(key, bars, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_write_dataset_dispatch() {
        let key = DatasetKey::finest("bitstampUSD");
        let bars = [Bar::single(0, 1.0, 1.0)];
        for format in OutputFormat::all() {
            let mut out = Vec::new();
            write_dataset(*format, &key, &bars, &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.contains("BITSTAMPUSD"), "{format}: {text}");
        }
    }
}
