//! Full-history backfill.

use coinbars_aggregate::MultiIntervalAggregator;
use coinbars_fetch::fetch_history;
use coinbars_types::{Dataset, DatasetKey, Interval, Symbol};

use crate::{EngineState, Result};

/// Outcome of one backfill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    /// Trades read.
    pub ticks: usize,
    /// Lines that could not be parsed.
    pub skipped_lines: usize,
    /// Bars persisted per interval.
    pub bars: Vec<(Interval, usize)>,
    /// Time of the newest trade.
    pub last_tick: Option<i64>,
}

impl BackfillSummary {
    /// Returns the number of bars persisted for `interval`.
    #[must_use]
    pub fn bars_for(&self, interval: Interval) -> usize {
        self.bars
            .iter()
            .find(|(i, _)| *i == interval)
            .map_or(0, |(_, n)| *n)
    }
}

/// Downloads the full trade history of `symbol` and persists every interval.
///
/// The caller holds the symbol's 1-minute critical section and passes its
/// slot. The newest bar of each interval may still be open, so it is left
/// out of the stored dataset; the next reconciliation picks it up from the
/// history delta. Each coarse interval is stored inside its own critical
/// section. Stored datasets replace whatever was resident, so every touched
/// slot is emptied and reloaded from the cache on next use.
///
/// # Errors
///
/// Returns an error if the history cannot be fetched or a dataset cannot be
/// stored.
pub async fn backfill_locked(
    state: &EngineState,
    symbol: &Symbol,
    finest: &mut Option<Dataset>,
) -> Result<BackfillSummary> {
    tracing::info!(symbol = %symbol, "backfilling full history");

    let batch = fetch_history(
        state.source.as_ref(),
        &state.config.history_url,
        symbol.as_str(),
        0,
        0,
    )
    .await?;

    let mut aggregator = MultiIntervalAggregator::all();
    for tick in &batch.ticks {
        aggregator.process_tick(tick);
    }

    let mut summary = BackfillSummary {
        ticks: batch.len(),
        skipped_lines: batch.skipped_lines,
        bars: Vec::new(),
        last_tick: batch.last_time(),
    };

    for (interval, mut bars) in aggregator.finish() {
        bars.pop();
        let dataset = Dataset::from_bars(bars)?;
        let stored = dataset.len();
        let key = DatasetKey::new(symbol.as_str(), interval);

        if interval == Interval::FINEST {
            state.store_cached(&key, dataset, true).await?;
            *finest = None;
        } else {
            let mut slot = state.registry.lock(&key).await;
            state.store_cached(&key, dataset, true).await?;
            *slot = None;
        }
        state.clear_cached_till(&key).await;

        tracing::debug!(symbol = %symbol, %interval, bars = stored, "backfill stored");
        summary.bars.push((interval, stored));
    }

    tracing::info!(
        symbol = %symbol,
        ticks = summary.ticks,
        skipped = summary.skipped_lines,
        "backfill complete"
    );
    Ok(summary)
}

/// Runs [`backfill_locked`] inside the symbol's 1-minute critical section.
///
/// # Errors
///
/// Returns an error if the history cannot be fetched or a dataset cannot be
/// stored.
pub async fn backfill(state: &EngineState, symbol: &Symbol) -> Result<BackfillSummary> {
    let mut finest = state
        .registry
        .lock(&DatasetKey::finest(symbol.as_str()))
        .await;
    backfill_locked(state, symbol, &mut finest).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, ScriptedSource, csv};
    use coinbars_store::DatasetCache;
    use coinbars_types::Bar;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_backfill_withholds_last_bar() {
        let source = Arc::new(ScriptedSource::new());
        source.history(
            "bitstampUSD",
            0,
            csv(&[(0, 10.0, 1.0), (30, 12.0, 1.0), (60, 11.0, 2.0), (61, 0.0, 0.0), (125, 9.0, 1.0)]),
        );
        let (state, cache) = testing::state(source, &["bitstampUSD"]).await;

        let summary = backfill(&state, &Symbol::new("bitstampUSD")).await.unwrap();
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.last_tick, Some(125_000));
        assert_eq!(summary.bars_for(Interval::Minute1), 2);
        assert_eq!(summary.bars_for(Interval::Minute5), 0);
        assert_eq!(summary.bars.len(), Interval::all().len());

        let minutes = cache
            .fetch(&DatasetKey::finest("bitstampUSD"))
            .unwrap()
            .unwrap();
        assert_eq!(
            minutes.bars(),
            &[
                Bar::new(0, 10.0, 12.0, 10.0, 12.0, 2.0),
                Bar::single(60_000, 11.0, 2.0),
            ]
        );
        // The 120s bar is the open one and stays out of the cache
        assert!(minutes.bars().iter().all(|b| b.time < 120_000));

        let daily = cache
            .fetch(&DatasetKey::new("bitstampUSD", Interval::Daily))
            .unwrap()
            .unwrap();
        assert!(daily.is_empty());
    }

    #[tokio::test]
    async fn test_backfill_evicts_resident_datasets() {
        let source = Arc::new(ScriptedSource::new());
        source.history("bitstampUSD", 0, csv(&[(0, 10.0, 1.0), (90_000, 11.0, 1.0)]));
        let (state, _) = testing::state(source, &["bitstampUSD"]).await;

        let daily = DatasetKey::new("bitstampUSD", Interval::Daily);
        *state.registry.lock(&daily).await = Some(Dataset::new());
        state.set_cached_till(&daily, 42).await;

        let summary = backfill(&state, &Symbol::new("bitstampUSD")).await.unwrap();
        assert_eq!(summary.bars_for(Interval::Daily), 1);
        assert!(!state.registry.is_resident(&daily).await);
        assert_eq!(state.cached_till(&daily).await, 0);
    }

    #[tokio::test]
    async fn test_backfill_propagates_fetch_errors() {
        let (state, cache) = testing::state(Arc::new(ScriptedSource::new()), &["bitstampUSD"]).await;
        assert!(backfill(&state, &Symbol::new("bitstampUSD")).await.is_err());
        assert!(cache.is_empty());
    }
}
