//! OHLCV bar data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar (candlestick).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start (epoch milliseconds).
    pub time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price in the bucket.
    pub high: f64,
    /// Lowest price in the bucket.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Total traded volume.
    pub volume: f64,
}

impl Bar {
    /// Creates a new bar.
    #[must_use]
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Creates a single-trade bar where all four prices equal `price`.
    #[must_use]
    pub const fn single(time: i64, price: f64, volume: f64) -> Self {
        Self::new(time, price, price, price, price, volume)
    }

    /// Returns a copy of this bar re-stamped with another bucket time.
    #[must_use]
    pub const fn at(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    /// Extends this bar with a later point of the same bucket.
    ///
    /// High and low widen, close moves to the point's close and the volume is
    /// added. The open and the bucket time are unchanged.
    pub fn merge(&mut self, point: &Self) {
        self.high = self.high.max(point.high);
        self.low = self.low.min(point.low);
        self.close = point.close;
        self.volume += point.volume;
    }

    /// Returns the bucket start as a UTC datetime.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}
