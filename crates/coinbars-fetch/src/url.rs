//! Exchange URL construction.

/// Default market list endpoint.
pub const MARKETS_URL: &str = "http://bitcoincharts.com/t/markets.json";

/// Default trade history endpoint.
pub const HISTORY_URL: &str = "http://bitcoincharts.com/t/trades.csv";

/// Default live feed socket address.
pub const FEED_ADDR: &str = "bitcoincharts.com:8002";

/// Builds the trade history URL for a symbol starting at `start` (epoch seconds).
///
/// URL format: `{base}?symbol={SYMBOL}&start={start}`
///
/// # Example
///
/// ```
/// use coinbars_fetch::url::history_url;
///
/// let url = history_url("http://bitcoincharts.com/t/trades.csv", "bitstampUSD", 0);
/// assert_eq!(url, "http://bitcoincharts.com/t/trades.csv?symbol=bitstampUSD&start=0");
/// ```
#[must_use]
pub fn history_url(base: &str, symbol: &str, start: i64) -> String {
    format!("{base}?symbol={symbol}&start={start}")
}
