//! Dataset reconciliation.
//!
//! The cache lags the exchange: the live feed only fills resident 1-minute
//! datasets, and persisted datasets end where the last reconciliation (or
//! backfill) stopped. A query closes that gap by downloading the trades
//! published since `cached_till`, merging the resulting bars and persisting
//! the closed ones. Coarse intervals are derived from the 1-minute dataset.

use coinbars_aggregate::{aggregate, aggregate_ticks};
use coinbars_fetch::fetch_history;
use coinbars_types::{Bar, Dataset, DatasetKey, Interval};
use std::sync::Arc;

use crate::backfill::backfill_locked;
use crate::{EngineState, Result};

/// Answers dataset queries against the cache and the live datasets.
#[derive(Debug, Clone)]
pub struct Reconciler {
    state: Arc<EngineState>,
}

impl Reconciler {
    /// Creates a reconciler over shared engine state.
    #[must_use]
    pub const fn new(state: Arc<EngineState>) -> Self {
        Self { state }
    }

    /// Returns the complete dataset of `symbol` at `interval`.
    ///
    /// Backfills the symbol on first use, then merges every trade published
    /// since the last persisted bar. Returns `None` for unknown symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be fetched, or if a backfill
    /// or a cache read fails.
    pub async fn fetch_data(&self, symbol: &str, interval: Interval) -> Result<Option<Dataset>> {
        let state = self.state.as_ref();
        let Some(canonical) = state.canonical(symbol).await else {
            return Ok(None);
        };

        let finest_key = DatasetKey::finest(symbol);
        let mut finest_slot = state.registry.lock(&finest_key).await;

        if finest_slot.is_none() && !state.is_cached(&finest_key).await? {
            backfill_locked(state, &canonical, &mut finest_slot).await?;
        }
        let finest = load(state, &finest_key, &mut finest_slot).await?;

        let cached_till = state.cached_till(&finest_key).await;
        let fetch_till = state.last_tick(symbol).await;
        let batch = fetch_history(
            state.source.as_ref(),
            &state.config.history_url,
            canonical.as_str(),
            cached_till,
            fetch_till,
        )
        .await?;

        if fetch_till == 0
            && let Some(time) = batch.last_time()
        {
            state.set_last_tick(symbol, time).await;
        }

        let delta = aggregate_ticks(&batch.ticks, Interval::FINEST);
        tracing::debug!(
            symbol = %canonical,
            since = cached_till,
            ticks = batch.len(),
            bars = delta.len(),
            "merging history delta"
        );
        merge(state, &finest_key, finest, &delta).await;

        if interval == Interval::FINEST {
            return Ok(Some(finest.clone()));
        }

        let coarse_key = DatasetKey::new(symbol, interval);
        let mut coarse_slot = state.registry.lock(&coarse_key).await;
        let coarse = load(state, &coarse_key, &mut coarse_slot).await?;

        let since = state.cached_till(&coarse_key).await;
        let bars = aggregate(finest.tail_from(since), interval);
        merge(state, &coarse_key, coarse, &bars).await;

        Ok(Some(coarse.clone()))
    }

    /// Returns the daily dataset of `symbol`, the resolution shown for
    /// favourites.
    ///
    /// # Errors
    ///
    /// See [`fetch_data`](Self::fetch_data).
    pub async fn fetch_for_favorites(&self, symbol: &str) -> Result<Option<Dataset>> {
        self.fetch_data(symbol, Interval::Daily).await
    }

    /// Returns the bars changed since the last poll.
    ///
    /// Nothing is returned until the symbol's 1-minute dataset is resident.
    /// At 1 minute this is the open bar. At a coarser interval the resident
    /// coarse dataset is brought up to date from the 1-minute tail and the
    /// updated bars are returned; an unchanged open bar yields nothing.
    pub async fn last_bars(&self, symbol: &str, interval: Interval) -> Vec<Bar> {
        let state = self.state.as_ref();
        let finest_slot = state.registry.lock(&DatasetKey::finest(symbol)).await;
        let Some(finest) = finest_slot.as_ref() else {
            return Vec::new();
        };

        if interval == Interval::FINEST {
            return finest.last().copied().into_iter().collect();
        }

        let mut coarse_slot = state
            .registry
            .lock(&DatasetKey::new(symbol, interval))
            .await;
        let Some(coarse) = coarse_slot.as_mut() else {
            return Vec::new();
        };

        let since = coarse.last_time().unwrap_or(i64::MIN);
        let bars = aggregate(finest.tail_from(since), interval);
        if bars.len() == 1 && coarse.last() == bars.first() {
            return Vec::new();
        }
        coarse.merge_closed(since, &bars);
        bars
    }

    /// Returns the newest bar of [`last_bars`](Self::last_bars).
    pub async fn last_bar(&self, symbol: &str, interval: Interval) -> Option<Bar> {
        self.last_bars(symbol, interval).await.pop()
    }
}

/// Returns the resident dataset of `key`, reading it from the cache on first
/// use.
///
/// On first use `cached_till` is set to the bucket after the last stored
/// bar, which is the first one that may still be missing.
async fn load<'a>(
    state: &EngineState,
    key: &DatasetKey,
    slot: &'a mut Option<Dataset>,
) -> Result<&'a mut Dataset> {
    if slot.is_none() {
        let dataset = state.fetch_cached(key).await?.unwrap_or_default();
        let cached_till = dataset
            .last_time()
            .map_or(0, |time| key.interval().next_start(time));
        state.set_cached_till(key, cached_till).await;
        tracing::debug!(%key, bars = dataset.len(), cached_till, "dataset loaded");
        *slot = Some(dataset);
    }
    Ok(slot.get_or_insert_with(Dataset::new))
}

/// Merges freshly aggregated `bars` into `dataset`.
///
/// All bars but the newest are closed: they are merged from `cached_till`
/// on, the dataset prefix ending with them is persisted and `cached_till`
/// moves past them. The newest bar is only appended in memory, and only when
/// it opens a later bucket than the dataset's last bar.
async fn merge(state: &EngineState, key: &DatasetKey, dataset: &mut Dataset, bars: &[Bar]) {
    let Some((newest, closed)) = bars.split_last() else {
        return;
    };

    if let Some(last_closed) = closed.last() {
        let since = state.cached_till(key).await;
        let end = dataset.merge_closed(since, closed);
        match state.store_cached(key, dataset.prefix(end), true).await {
            Ok(_) => {
                let next = key.interval().next_start(last_closed.time);
                state.set_cached_till(key, next).await;
            }
            // Bars stay resident and are persisted by the next query
            Err(e) => tracing::warn!(%key, error = %e, "failed to persist dataset"),
        }
    }

    if dataset.last_time().is_none_or(|last| newest.time > last) {
        // Cannot fail: the bar is later than the last one
        let _ = dataset.push(*newest);
    }
}
