//! Bar interval definitions.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MINUTE_MS: i64 = 60_000;
const DAY_MS: i64 = 86_400_000;

/// Width of an OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    /// 1-minute bars.
    #[serde(rename = "1m")]
    Minute1,
    /// 5-minute bars.
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute bars.
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "30m")]
    Minute30,
    /// 60-minute bars.
    #[serde(rename = "60m")]
    Minute60,
    /// Daily bars.
    #[serde(rename = "1d")]
    Daily,
    /// Weekly bars, aligned to the epoch.
    #[serde(rename = "1w")]
    Weekly,
    /// Calendar-month bars (UTC).
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    /// The interval every other interval is derived from.
    pub const FINEST: Self = Self::Minute1;

    /// Returns the fixed bar length in seconds, or `None` for calendar months.
    #[must_use]
    pub const fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Self::Minute1 => Some(60),
            Self::Minute5 => Some(300),
            Self::Minute15 => Some(900),
            Self::Minute30 => Some(1800),
            Self::Minute60 => Some(3600),
            Self::Daily => Some(86_400),
            Self::Weekly => Some(604_800),
            Self::Monthly => None,
        }
    }

    /// Returns the start (epoch ms) of the bucket containing `time_ms`.
    #[must_use]
    pub fn bucket_start(&self, time_ms: i64) -> i64 {
        match self.fixed_seconds() {
            Some(s) => {
                let len = s * 1000;
                time_ms.div_euclid(len) * len
            }
            None => month_start(time_ms),
        }
    }

    /// Returns the start (epoch ms) of the bucket following the one starting
    /// at `bucket_ms`.
    #[must_use]
    pub fn next_start(&self, bucket_ms: i64) -> i64 {
        match self.fixed_seconds() {
            Some(s) => bucket_ms + s * 1000,
            None => next_month_start(bucket_ms),
        }
    }

    /// Returns the interval code used in dataset keys.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Minute30 => "30m",
            Self::Minute60 => "60m",
            Self::Daily => "1d",
            Self::Weekly => "1w",
            Self::Monthly => "1mo",
        }
    }

    /// Returns every supported interval, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute5,
            Self::Minute15,
            Self::Minute30,
            Self::Minute60,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
        ]
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::FINEST
    }
}

fn month_start(time_ms: i64) -> i64 {
    DateTime::from_timestamp_millis(time_ms)
        .and_then(|dt| Utc.with_ymd_and_hms(dt.year(), dt.month(), 1, 0, 0, 0).single())
        .map_or_else(|| time_ms.div_euclid(DAY_MS) * DAY_MS, |dt| dt.timestamp_millis())
}

fn next_month_start(bucket_ms: i64) -> i64 {
    DateTime::from_timestamp_millis(bucket_ms)
        .and_then(|dt| {
            let (year, month) = if dt.month() == 12 {
                (dt.year() + 1, 1)
            } else {
                (dt.year(), dt.month() + 1)
            };
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
        })
        .map_or(bucket_ms + 31 * DAY_MS, |dt| dt.timestamp_millis())
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "m1" | "minute" | "minute1" => Ok(Self::Minute1),
            "5m" | "m5" | "minute5" => Ok(Self::Minute5),
            "15m" | "m15" | "minute15" => Ok(Self::Minute15),
            "30m" | "m30" | "minute30" => Ok(Self::Minute30),
            "60m" | "1h" | "h1" | "hour" | "minute60" => Ok(Self::Minute60),
            "1d" | "d1" | "day" | "daily" => Ok(Self::Daily),
            "1w" | "w1" | "week" | "weekly" => Ok(Self::Weekly),
            "1mo" | "mo1" | "month" | "monthly" => Ok(Self::Monthly),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: 1m, 5m, 15m, 30m, 60m, 1d, 1w, 1mo",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
