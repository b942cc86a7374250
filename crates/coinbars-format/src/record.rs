//! Flat bar records shared by the writers.

use coinbars_types::{Bar, DatasetKey, Interval};
use serde::Serialize;

/// One bar as it appears in CSV rows and JSON documents.
///
/// `closed` is false for the newest bar of a dataset, which may still be
/// trading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRecord {
    /// Bucket start as `YYYY-MM-DDTHH:MM:SSZ`.
    pub time: String,
    /// Bucket start (epoch milliseconds).
    pub time_ms: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded amount.
    pub volume: f64,
    /// False while the bucket can still receive trades.
    pub closed: bool,
}

impl BarRecord {
    /// Builds the record for `bar`.
    #[must_use]
    pub fn new(bar: &Bar, closed: bool) -> Self {
        let time = bar.datetime().map_or_else(
            || bar.time.to_string(),
            |ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        );
        Self {
            time,
            time_ms: bar.time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            closed,
        }
    }
}

/// Records for the tail `bars` of a dataset; only the last one is open.
pub(crate) fn records(bars: &[Bar]) -> impl Iterator<Item = BarRecord> + '_ {
    let last = bars.len().saturating_sub(1);
    bars.iter()
        .enumerate()
        .map(move |(i, bar)| BarRecord::new(bar, i < last))
}

/// A record tagged with its dataset, for line-oriented output.
#[derive(Debug, Serialize)]
pub(crate) struct KeyedRecord<'a> {
    pub(crate) symbol: &'a str,
    pub(crate) interval: Interval,
    #[serde(flatten)]
    pub(crate) bar: BarRecord,
}

impl<'a> KeyedRecord<'a> {
    pub(crate) fn new(key: &'a DatasetKey, bar: BarRecord) -> Self {
        Self {
            symbol: key.symbol(),
            interval: key.interval(),
            bar,
        }
    }
}
