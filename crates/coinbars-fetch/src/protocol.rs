//! Live feed line protocol.
//!
//! The feed speaks newline-delimited JSON. The client subscribes once with
//! [`SUBSCRIBE_REQUEST`] and answers read timeouts with [`HEARTBEAT`].

use coinbars_types::Tick;
use serde::Deserialize;

use crate::ParseError;
use crate::parse::tick_from_secs;

/// Subscription request for the tick channel.
pub const SUBSCRIBE_REQUEST: &str = "{\"action\":\"subscribe\",\"channel\":\"tick\"}\r\n";

/// Heartbeat line sent when the feed has been idle.
pub const HEARTBEAT: &str = "\r\n";

/// Channel prefix of trade messages.
pub const TICK_CHANNEL: &str = "tick";

/// One message read from the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedMessage {
    /// Channel name.
    pub channel: String,
    /// Message body; absent for control messages.
    #[serde(default)]
    pub payload: Option<FeedTick>,
}

/// Payload of a tick-channel message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedTick {
    /// Market symbol as spelled by the feed.
    pub symbol: String,
    /// Trade time (epoch seconds).
    pub timestamp: i64,
    /// Trade price.
    pub price: f64,
    /// Traded amount.
    pub volume: f64,
}

impl FeedMessage {
    /// Returns true if the message belongs to the tick channel.
    #[must_use]
    pub fn is_tick(&self) -> bool {
        self.channel.starts_with(TICK_CHANNEL)
    }

    /// Returns the upper-case symbol and the tick, for tick-channel messages.
    ///
    /// Other channels and payload-less messages yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is out of range.
    pub fn into_tick(self) -> Result<Option<(String, Tick)>, ParseError> {
        if !self.is_tick() {
            return Ok(None);
        }
        let Some(p) = self.payload else {
            return Ok(None);
        };
        let tick = tick_from_secs(p.timestamp, p.price, p.volume)?;
        Ok(Some((p.symbol.to_uppercase(), tick)))
    }
}

/// Parses one feed line.
///
/// # Errors
///
/// Returns an error if the line is not a feed message.
pub fn parse_feed_line(line: &str) -> Result<FeedMessage, ParseError> {
    serde_json::from_str(line.trim()).map_err(|e| ParseError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tick_message() {
        let line = r#"{"channel":"tick","payload":{"symbol":"bitstampUSD","timestamp":1366642800,"price":124.5,"volume":0.5}}"#;
        let (symbol, tick) = parse_feed_line(line).unwrap().into_tick().unwrap().unwrap();
        assert_eq!(symbol, "BITSTAMPUSD");
        assert_eq!(tick, Tick::new(1_366_642_800_000, 124.5, 0.5));
    }

    #[test]
    fn test_channel_prefix_match() {
        let line = r#"{"channel":"tick.bitstampUSD","payload":{"symbol":"bitstampUSD","timestamp":1,"price":1,"volume":1}}"#;
        assert!(parse_feed_line(line).unwrap().is_tick());
    }

    #[test]
    fn test_other_channel_ignored() {
        let line = r#"{"channel":"trade","payload":{"symbol":"x","timestamp":1,"price":1,"volume":1}}"#;
        assert_eq!(parse_feed_line(line).unwrap().into_tick(), Ok(None));
    }

    #[test]
    fn test_timestamp_overflow_is_an_error() {
        let line = r#"{"channel":"tick","payload":{"symbol":"bitstampUSD","timestamp":9223372036854775807,"price":1,"volume":1}}"#;
        assert!(matches!(
            parse_feed_line(line).unwrap().into_tick(),
            Err(ParseError::InvalidNumber { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_garbage_line() {
        assert!(parse_feed_line("not json").is_err());
        assert!(parse_feed_line(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn test_subscribe_request_is_one_line() {
        assert!(SUBSCRIBE_REQUEST.ends_with("\r\n"));
        assert_eq!(SUBSCRIBE_REQUEST.trim_end().lines().count(), 1);
    }
}
