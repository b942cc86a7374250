//! Exchange symbols and dataset keys.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::Interval;

/// Canonical, case-preserving market symbol (e.g. `"bitstampUSD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from its canonical spelling.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Returns the canonical spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the upper-case lookup key.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        self.0.to_uppercase()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifies one dataset: a symbol at one interval.
///
/// The symbol part is always the upper-case lookup key so that live ticks and
/// queries spelled differently land on the same dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{symbol}-{interval}")]
pub struct DatasetKey {
    symbol: String,
    interval: Interval,
}

impl DatasetKey {
    /// Creates a key for `symbol` at `interval`.
    #[must_use]
    pub fn new(symbol: &str, interval: Interval) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            interval,
        }
    }

    /// Creates the key of the finest dataset for `symbol`.
    #[must_use]
    pub fn finest(symbol: &str) -> Self {
        Self::new(symbol, Interval::FINEST)
    }

    /// Returns the upper-case symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the interval.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_lookup_key() {
        let symbol = Symbol::new("bitstampUSD");
        assert_eq!(symbol.as_str(), "bitstampUSD");
        assert_eq!(symbol.lookup_key(), "BITSTAMPUSD");
        assert_eq!(symbol.to_string(), "bitstampUSD");
    }

    #[test]
    fn test_dataset_key_display() {
        let key = DatasetKey::new("bitstampUSD", Interval::Minute15);
        assert_eq!(key.to_string(), "BITSTAMPUSD-15m");
        assert_eq!(key.symbol(), "BITSTAMPUSD");
        assert_eq!(key.interval(), Interval::Minute15);
    }

    #[test]
    fn test_dataset_key_case_insensitive() {
        assert_eq!(DatasetKey::finest("mtgoxUSD"), DatasetKey::finest("MTGOXUSD"));
    }
}
