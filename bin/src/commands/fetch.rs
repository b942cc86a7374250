//! Fetch command implementation.
//!
//! Brings a market's dataset up to date (backfilling it on first use) and
//! writes it out in the requested format.

use crate::display::{Format, spinner, write_dataset};
use anyhow::{Context, Result, bail};
use coinbars_lib::prelude::*;
use std::path::Path;

/// Fetch the complete dataset of `symbol` at `interval`.
pub(crate) async fn fetch(
    config: EngineConfig,
    symbol: &str,
    interval: Interval,
    last: Option<usize>,
    format: Format,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let provider = Provider::from_config(config)?;
    provider
        .load_markets()
        .await
        .context("Failed to load the market list")?;

    let progress = spinner(format!("{symbol} {interval}: reconciling"), quiet);
    let dataset = provider
        .fetch_data(symbol, interval)
        .await
        .with_context(|| format!("Failed to fetch {symbol} at {interval}"))?;
    let Some(dataset) = dataset else {
        progress.finish_and_clear();
        bail!("Unknown symbol: {symbol}");
    };
    progress.finish_with_message(format!("{} bars", dataset.len()));

    let bars = match last {
        Some(n) => dataset.last_n(n),
        None => dataset.bars(),
    };
    write_dataset(&DatasetKey::new(symbol, interval), bars, output, format)?;

    if let Some(path) = output
        && !quiet
    {
        println!("Output written to: {}", path.display());
    }

    Ok(())
}
