//! Backfill command implementation.
//!
//! Re-downloads a market's full trade history and rewrites every cached
//! interval from it.

use crate::display::spinner;
use anyhow::{Context, Result};
use coinbars_lib::prelude::*;

/// Backfill `symbol` and print the bars stored per interval.
pub(crate) async fn backfill(config: EngineConfig, symbol: &str, quiet: bool) -> Result<()> {
    let provider = Provider::from_config(config)?;
    provider
        .load_markets()
        .await
        .context("Failed to load the market list")?;

    let progress = spinner(format!("{symbol}: downloading full history"), quiet);
    let summary = provider.backfill(symbol).await?;
    progress.finish_with_message(format!(
        "{} trades ({} unreadable lines)",
        summary.ticks, summary.skipped_lines
    ));

    println!("{:<10} {:>10}", "INTERVAL", "BARS");
    println!("{}", "-".repeat(21));
    for interval in Interval::all() {
        println!("{:<10} {:>10}", interval.code(), summary.bars_for(*interval));
    }
    if let Some(time) = summary.last_tick.and_then(chrono::DateTime::from_timestamp_millis) {
        println!("\nNewest trade: {}", time.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    Ok(())
}
