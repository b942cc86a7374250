//! Symbol directory.

use coinbars_fetch::{LineSource, parse_markets};
use coinbars_types::Symbol;
use std::collections::{HashMap, HashSet};

use crate::Result;

/// One autocomplete result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolMatch {
    /// Canonical symbol.
    pub symbol: Symbol,
    /// Display name; the exchange publishes none, so this is the symbol.
    pub name: String,
}

/// Case-insensitive index of the exchange's markets.
#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    by_key: HashMap<String, Symbol>,
}

impl SymbolDirectory {
    /// Builds a directory from canonical symbols.
    #[must_use]
    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            by_key: symbols
                .into_iter()
                .map(|s| (s.lookup_key(), s))
                .collect(),
        }
    }

    /// Downloads and indexes the market list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be fetched or parsed.
    pub async fn load(source: &dyn LineSource, markets_url: &str) -> Result<Self> {
        let body = source.get_lines(markets_url).await?.join("\n");
        let directory = Self::from_symbols(parse_markets(&body)?);
        tracing::info!(markets = directory.len(), "market list loaded");
        Ok(directory)
    }

    /// Returns the canonical spelling of `symbol`.
    #[must_use]
    pub fn canonical(&self, symbol: &str) -> Option<&Symbol> {
        self.by_key.get(&symbol.to_uppercase())
    }

    /// Returns true if `symbol` is listed, in any letter case.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.canonical(symbol).is_some()
    }

    /// Returns the number of markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true if no market is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterates over the upper-case lookup keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.by_key.keys().map(String::as_str)
    }

    /// Iterates over the canonical symbols.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.by_key.values()
    }

    /// Returns every market whose symbol starts with `prefix`, ignoring case.
    #[must_use]
    pub fn autocomplete(&self, prefix: &str) -> HashSet<SymbolMatch> {
        let prefix = prefix.to_uppercase();
        self.by_key
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, symbol)| SymbolMatch {
                symbol: symbol.clone(),
                name: symbol.to_string(),
            })
            .collect()
    }

    /// Returns the display name of `symbol`, which is the symbol itself.
    #[must_use]
    pub fn company_name(&self, symbol: &str) -> Option<String> {
        self.canonical(symbol).map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> SymbolDirectory {
        SymbolDirectory::from_symbols(
            ["bitstampUSD", "btceUSD", "mtgoxEUR"].map(Symbol::new),
        )
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = directory();
        assert_eq!(directory.canonical("BITSTAMPUSD").unwrap().as_str(), "bitstampUSD");
        assert!(directory.contains("btceusd"));
        assert!(!directory.contains("krakenUSD"));
        assert_eq!(directory.len(), 3);
    }

    #[test]
    fn test_autocomplete() {
        let directory = directory();

        let matches = directory.autocomplete("b");
        assert_eq!(matches.len(), 2);
        assert!(matches.contains(&SymbolMatch {
            symbol: Symbol::new("btceUSD"),
            name: "btceUSD".to_string(),
        }));

        assert_eq!(directory.autocomplete("").len(), 3);
        assert!(directory.autocomplete("x").is_empty());
    }

    #[test]
    fn test_company_name_is_symbol() {
        let directory = directory();
        assert_eq!(directory.company_name("MTGOXEUR").as_deref(), Some("mtgoxEUR"));
        assert_eq!(directory.company_name("nope"), None);
    }
}
