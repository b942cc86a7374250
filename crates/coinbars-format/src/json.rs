//! JSON output.

use coinbars_types::{Bar, DatasetKey, Interval};
use serde::Serialize;
use std::io::Write;

use crate::record::{BarRecord, KeyedRecord, records};
use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// One document: `{"symbol", "interval", "bars": [...]}`.
    #[default]
    Document,
    /// One self-describing bar per line (NDJSON).
    Ndjson,
}

#[derive(Serialize)]
struct Document<'a> {
    symbol: &'a str,
    interval: Interval,
    bars: Vec<BarRecord>,
}

/// JSON formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
}

impl JsonFormatter {
    /// Creates a formatter writing one JSON document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Document,
        }
    }

    /// Creates a formatter writing NDJSON.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
        }
    }

    /// Returns the output style.
    #[must_use]
    pub const fn style(&self) -> JsonStyle {
        self.style
    }
}

impl Formatter for JsonFormatter {
    fn write_dataset<W: Write + Send>(
        &self,
        key: &DatasetKey,
        bars: &[Bar],
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Document => {
                let document = Document {
                    symbol: key.symbol(),
                    interval: key.interval(),
                    bars: records(bars).collect(),
                };
                serde_json::to_writer(&mut writer, &document)?;
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records(bars) {
                    serde_json::to_writer(&mut writer, &KeyedRecord::new(key, record))?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Document => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn bars() -> [Bar; 2] {
        [
            Bar::new(60_000, 10.0, 12.5, 9.5, 11.0, 2.0),
            Bar::single(120_000, 11.0, 0.5),
        ]
    }

    #[test]
    fn test_document() {
        let key = DatasetKey::new("bitstampUSD", Interval::Minute1);
        let mut out = Vec::new();
        JsonFormatter::new().write_dataset(&key, &bars(), &mut out).unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["symbol"], "BITSTAMPUSD");
        assert_eq!(doc["interval"], "1m");
        assert_eq!(doc["bars"].as_array().unwrap().len(), 2);
        assert_eq!(doc["bars"][0]["high"], 12.5);
        assert_eq!(doc["bars"][0]["closed"], true);
        assert_eq!(doc["bars"][1]["closed"], false);
    }

    #[test]
    fn test_ndjson_lines_carry_the_key() {
        let key = DatasetKey::new("btceUSD", Interval::Daily);
        let formatter = JsonFormatter::ndjson();
        let mut out = Vec::new();
        formatter.write_dataset(&key, &bars(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l["symbol"] == "BTCEUSD" && l["interval"] == "1d"));
        assert_eq!(lines[1]["time_ms"], 120_000);
        assert_eq!(formatter.extension(), "ndjson");
        assert_eq!(formatter.style(), JsonStyle::Ndjson);
    }
}
