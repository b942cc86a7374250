//! Watch command implementation.
//!
//! Starts the live feed and polls the market's changed bars, printing each
//! update until interrupted.

use crate::display::{format_bar, spinner};
use anyhow::{Context, Result, bail};
use coinbars_lib::prelude::*;
use std::time::Duration;

/// Follow `symbol` at `interval`, polling every `every` seconds.
pub(crate) async fn watch(
    config: EngineConfig,
    symbol: &str,
    interval: Interval,
    every: u64,
    quiet: bool,
) -> Result<()> {
    let provider = Provider::from_config(config)?;
    provider
        .initialize()
        .await
        .context("Failed to start the engine")?;

    let progress = spinner(format!("{symbol} {interval}: loading"), quiet);
    let Some(dataset) = provider.fetch_data(symbol, interval).await? else {
        progress.finish_and_clear();
        bail!("Unknown symbol: {symbol}");
    };
    progress.finish_and_clear();

    if let Some(bar) = dataset.last() {
        println!("{}", format_bar(bar));
    }

    let period = Duration::from_secs(every).max(Provider::REFRESH_INTERVAL);
    let mut ticker = tokio::time::interval(period);
    let mut feed_state = provider.feed_state();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let state = provider.feed_state();
                if state != feed_state {
                    tracing::info!(?state, "feed state changed");
                    feed_state = state;
                }
                for bar in provider.last_bars(symbol, interval).await {
                    println!("{}", format_bar(&bar));
                }
            }
        }
    }

    provider.shutdown();
    Ok(())
}
