//! Symbols command implementation.
//!
//! Lists the exchange's markets, optionally narrowed by symbol prefix.

use anyhow::{Context, Result};
use coinbars_lib::prelude::*;

/// List markets whose symbol starts with `prefix` (all markets without one).
pub(crate) async fn list_symbols(config: EngineConfig, prefix: Option<&str>) -> Result<()> {
    let provider = Provider::from_config(config)?;
    provider
        .load_markets()
        .await
        .context("Failed to load the market list")?;

    let symbols: Vec<Symbol> = match prefix {
        Some(prefix) => {
            let mut symbols: Vec<Symbol> = provider
                .autocomplete(prefix)
                .await
                .into_iter()
                .map(|m| m.symbol)
                .collect();
            symbols.sort();
            symbols
        }
        None => provider.symbols().await,
    };

    if symbols.is_empty() {
        println!("No markets found.");
        return Ok(());
    }

    for symbol in &symbols {
        println!("{symbol}");
    }

    println!("\nTotal: {} markets", symbols.len());
    Ok(())
}
