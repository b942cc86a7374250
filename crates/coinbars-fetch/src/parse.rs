//! Parsing of the market list and the trade history CSV.

use coinbars_types::{Symbol, Tick};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while parsing exchange responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A CSV line had fewer than the expected fields.
    #[error("Missing field '{0}' in line")]
    MissingField(&'static str),

    /// A field could not be parsed as a number.
    #[error("Invalid {field}: '{value}'")]
    InvalidNumber {
        /// The field name.
        field: &'static str,
        /// The raw value.
        value: String,
    },

    /// Malformed JSON.
    #[error("Invalid JSON: {0}")]
    Json(String),
}

/// Parses one `timestamp,price,amount` history line.
///
/// The timestamp is in epoch seconds; the returned tick is in milliseconds.
/// Zero-amount lines parse successfully and are filtered by the caller via
/// [`Tick::is_trade`].
///
/// # Errors
///
/// Returns an error if a field is missing or not numeric, or if the
/// timestamp is out of range.
pub fn parse_history_line(line: &str) -> Result<Tick, ParseError> {
    let mut fields = line.trim().split(',');

    let time = parse_field::<i64>(fields.next(), "timestamp")?;
    let price = parse_field::<f64>(fields.next(), "price")?;
    let amount = parse_field::<f64>(fields.next(), "amount")?;

    tick_from_secs(time, price, amount)
}

/// Builds a tick from an epoch-seconds timestamp, rejecting timestamps that
/// overflow epoch milliseconds.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] for the `timestamp` field.
pub fn tick_from_secs(secs: i64, price: f64, volume: f64) -> Result<Tick, ParseError> {
    Tick::from_secs(secs, price, volume).ok_or_else(|| ParseError::InvalidNumber {
        field: "timestamp",
        value: secs.to_string(),
    })
}

fn parse_field<T: std::str::FromStr>(
    field: Option<&str>,
    name: &'static str,
) -> Result<T, ParseError> {
    let raw = field.ok_or(ParseError::MissingField(name))?.trim();
    raw.parse().map_err(|_| ParseError::InvalidNumber {
        field: name,
        value: raw.to_string(),
    })
}

#[derive(Deserialize)]
struct Market {
    symbol: Option<String>,
}

/// Parses the market list: a JSON array of objects carrying a `symbol` field.
///
/// Entries without a `symbol` are skipped; other fields are ignored.
///
/// # Errors
///
/// Returns an error if the body is not a JSON array of objects.
pub fn parse_markets(body: &str) -> Result<Vec<Symbol>, ParseError> {
    let markets: Vec<Market> =
        serde_json::from_str(body).map_err(|e| ParseError::Json(e.to_string()))?;

    Ok(markets
        .into_iter()
        .filter_map(|m| m.symbol)
        .map(Symbol::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_line() {
        let tick = parse_history_line("1366642800,124.5,0.25").unwrap();
        assert_eq!(tick.time, 1_366_642_800_000);
        assert!((tick.price - 124.5).abs() < 1e-12);
        assert!((tick.volume - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parse_history_line_trailing_cr() {
        let tick = parse_history_line("1366642800,124.5,0.000000000000\r").unwrap();
        assert!(!tick.is_trade());
    }

    #[test]
    fn test_parse_history_line_errors() {
        assert_eq!(
            parse_history_line("1366642800,124.5"),
            Err(ParseError::MissingField("amount"))
        );
        assert!(matches!(
            parse_history_line("abc,1,1"),
            Err(ParseError::InvalidNumber { field: "timestamp", .. })
        ));
    }

    #[test]
    fn test_parse_history_line_timestamp_overflow() {
        assert_eq!(
            parse_history_line("9223372036854775807,1,1"),
            Err(ParseError::InvalidNumber {
                field: "timestamp",
                value: "9223372036854775807".to_string(),
            })
        );
        assert!(parse_history_line("-9223372036854775808,1,1").is_err());
    }

    #[test]
    fn test_parse_markets() {
        let body = r#"[
            {"symbol": "bitstampUSD", "currency": "USD", "volume": 12.5},
            {"currency": "EUR"},
            {"symbol": "mtgoxEUR"}
        ]"#;
        let symbols = parse_markets(body).unwrap();
        assert_eq!(symbols, vec![Symbol::new("bitstampUSD"), Symbol::new("mtgoxEUR")]);
    }

    #[test]
    fn test_parse_markets_rejects_non_array() {
        assert!(matches!(parse_markets("{\"symbol\":1}"), Err(ParseError::Json(_))));
    }
}
