//! Last command implementation.

use crate::display::format_bar;
use anyhow::{Context, Result, bail};
use coinbars_lib::prelude::*;

/// Show the newest bar of `symbol` at `interval`.
pub(crate) async fn show_last(config: EngineConfig, symbol: &str, interval: Interval) -> Result<()> {
    let provider = Provider::from_config(config)?;
    provider
        .load_markets()
        .await
        .context("Failed to load the market list")?;

    let Some(dataset) = provider.fetch_data(symbol, interval).await? else {
        bail!("Unknown symbol: {symbol}");
    };

    match dataset.last() {
        Some(bar) => println!("{}", format_bar(bar)),
        None => println!("No trades for {symbol}."),
    }
    Ok(())
}
