//! Data provider facade.

use coinbars_fetch::{FetchError, HttpClient, LineSource};
use coinbars_store::{DatasetCache, FileCache};
use coinbars_types::{Bar, Dataset, Interval, Symbol};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backfill::{BackfillSummary, backfill};
use crate::{
    EngineConfig, EngineError, EngineState, FeedState, LiveFeed, LiveFeedHandle, Reconciler,
    Result, SymbolDirectory, SymbolMatch,
};

/// Handle to one running engine.
///
/// Cheap to share behind an `Arc`; every query may run concurrently with the
/// live feed and with other queries.
#[derive(Debug)]
pub struct Provider {
    state: Arc<EngineState>,
    reconciler: Reconciler,
    feed: Mutex<Option<LiveFeedHandle>>,
}

impl Provider {
    /// Interval at which the UI should poll [`last_bars`](Self::last_bars).
    pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

    /// Creates a provider over the given collaborators.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        cache: Arc<dyn DatasetCache>,
        source: Arc<dyn LineSource>,
    ) -> Self {
        let state = Arc::new(EngineState::new(config, cache, source));
        Self {
            reconciler: Reconciler::new(Arc::clone(&state)),
            state,
            feed: Mutex::new(None),
        }
    }

    /// Creates a provider using HTTP and a file cache in `config.cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the cache directory cannot be
    /// created.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let cache = FileCache::new(config.cache_dir.clone())?;
        let client = HttpClient::new(config.client.clone()).map_err(FetchError::from)?;
        Ok(Self::new(config, Arc::new(cache), Arc::new(client)))
    }

    /// Returns the shared engine state.
    #[must_use]
    pub const fn state(&self) -> &Arc<EngineState> {
        &self.state
    }

    /// Loads the market list and starts the live feed.
    ///
    /// If the market list cannot be loaded the feed is not started.
    ///
    /// # Errors
    ///
    /// Returns an error if the market list cannot be fetched or parsed.
    pub async fn initialize(&self) -> Result<()> {
        self.load_markets().await?;
        self.start_feed();
        Ok(())
    }

    /// Loads the market list without starting the live feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the market list cannot be fetched or parsed.
    pub async fn load_markets(&self) -> Result<usize> {
        let directory =
            match SymbolDirectory::load(self.state.source.as_ref(), &self.state.config.markets_url)
                .await
            {
                Ok(directory) => directory,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load market list");
                    return Err(e);
                }
            };
        let markets = directory.len();
        self.state.install_directory(directory).await;
        Ok(markets)
    }

    /// Starts the live feed unless it is already running.
    pub fn start_feed(&self) {
        if let Ok(mut feed) = self.feed.lock()
            && feed.as_ref().is_none_or(LiveFeedHandle::is_finished)
        {
            *feed = Some(LiveFeed::spawn(Arc::clone(&self.state)));
        }
    }

    /// Returns the live feed state, or `None` if it was never started.
    #[must_use]
    pub fn feed_state(&self) -> Option<FeedState> {
        self.feed
            .lock()
            .ok()
            .and_then(|feed| feed.as_ref().map(LiveFeedHandle::state))
    }

    /// Stops the live feed.
    pub fn shutdown(&self) {
        if let Ok(mut feed) = self.feed.lock()
            && let Some(handle) = feed.take()
        {
            handle.abort();
            tracing::info!("live feed stopped");
        }
    }

    /// Returns every market whose symbol starts with `prefix`, ignoring case.
    pub async fn autocomplete(&self, prefix: &str) -> HashSet<SymbolMatch> {
        self.state.directory.read().await.autocomplete(prefix)
    }

    /// Returns the canonical symbols, sorted.
    pub async fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.state.directory.read().await.symbols().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Returns the display name of `symbol`.
    pub async fn company_name(&self, symbol: &str) -> Option<String> {
        self.state.directory.read().await.company_name(symbol)
    }

    /// Downloads the full history of `symbol` and persists every interval.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown symbols, or if the history cannot be
    /// fetched or stored.
    pub async fn backfill(&self, symbol: &str) -> Result<BackfillSummary> {
        let canonical = self
            .state
            .canonical(symbol)
            .await
            .ok_or_else(|| EngineError::UnknownSymbol(symbol.to_string()))?;
        backfill(&self.state, &canonical).await
    }

    /// Returns the complete dataset of `symbol` at `interval`.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::fetch_data`].
    pub async fn fetch_data(&self, symbol: &str, interval: Interval) -> Result<Option<Dataset>> {
        self.reconciler.fetch_data(symbol, interval).await
    }

    /// Returns the daily dataset of `symbol`.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::fetch_data`].
    pub async fn fetch_for_favorites(&self, symbol: &str) -> Result<Option<Dataset>> {
        self.reconciler.fetch_for_favorites(symbol).await
    }

    /// Returns the bars changed since the last poll.
    pub async fn last_bars(&self, symbol: &str, interval: Interval) -> Vec<Bar> {
        self.reconciler.last_bars(symbol, interval).await
    }

    /// Returns the newest changed bar.
    pub async fn last_bar(&self, symbol: &str, interval: Interval) -> Option<Bar> {
        self.reconciler.last_bar(symbol, interval).await
    }
}

impl Drop for Provider {
    fn drop(&mut self) {
        self.shutdown();
    }
}
