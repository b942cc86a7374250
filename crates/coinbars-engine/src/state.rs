//! Shared engine state.

use coinbars_fetch::LineSource;
use coinbars_store::{DatasetCache, DatasetRegistry};
use coinbars_types::{Dataset, DatasetKey, Symbol};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{EngineConfig, EngineError, Result, SymbolDirectory};

/// Per-symbol and per-dataset progress markers.
#[derive(Debug, Clone, Default)]
pub struct Watermarks {
    /// Time of the newest live trade applied, per upper-case symbol.
    ///
    /// A symbol is only accepted by the live feed once it has an entry.
    pub last_tick: HashMap<String, i64>,
    /// First bucket start not yet persisted, per dataset.
    pub cached_till: HashMap<DatasetKey, i64>,
}

impl Watermarks {
    /// Sets every symbol's `last_tick` back to zero.
    pub fn reset_last_ticks(&mut self) {
        self.last_tick.values_mut().for_each(|t| *t = 0);
    }
}

/// State shared by the live feed task and the query handlers.
///
/// Lock order: a dataset slot from [`DatasetRegistry`] may be held while
/// taking `watermarks` or `directory`, never the other way round.
pub struct EngineState {
    /// Engine settings.
    pub config: EngineConfig,
    /// Known markets.
    pub directory: RwLock<SymbolDirectory>,
    /// Live and persistence watermarks.
    pub watermarks: RwLock<Watermarks>,
    /// Resident datasets and their critical sections.
    pub registry: DatasetRegistry,
    /// Durable dataset cache.
    pub cache: Arc<dyn DatasetCache>,
    /// HTTP line source.
    pub source: Arc<dyn LineSource>,
}

impl std::fmt::Debug for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineState")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl EngineState {
    /// Creates state with an empty directory.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        cache: Arc<dyn DatasetCache>,
        source: Arc<dyn LineSource>,
    ) -> Self {
        Self {
            config,
            directory: RwLock::new(SymbolDirectory::default()),
            watermarks: RwLock::new(Watermarks::default()),
            registry: DatasetRegistry::new(),
            cache,
            source,
        }
    }

    /// Installs `directory` and gives each of its symbols a zero `last_tick`.
    pub async fn install_directory(&self, directory: SymbolDirectory) {
        {
            let mut watermarks = self.watermarks.write().await;
            for key in directory.keys() {
                watermarks.last_tick.insert(key.to_string(), 0);
            }
        }
        *self.directory.write().await = directory;
    }

    /// Returns the canonical spelling of `symbol`.
    pub async fn canonical(&self, symbol: &str) -> Option<Symbol> {
        self.directory.read().await.canonical(symbol).cloned()
    }

    /// Returns the `last_tick` watermark of `symbol`, `0` if unset.
    pub async fn last_tick(&self, symbol: &str) -> i64 {
        self.watermarks
            .read()
            .await
            .last_tick
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(0)
    }

    /// Sets the `last_tick` watermark of `symbol`.
    pub async fn set_last_tick(&self, symbol: &str, time: i64) {
        self.watermarks
            .write()
            .await
            .last_tick
            .insert(symbol.to_uppercase(), time);
    }

    /// Resets every `last_tick` watermark to zero.
    pub async fn reset_last_ticks(&self) {
        self.watermarks.write().await.reset_last_ticks();
    }

    /// Returns the `cached_till` watermark of `key`, `0` if unset.
    pub async fn cached_till(&self, key: &DatasetKey) -> i64 {
        self.watermarks
            .read()
            .await
            .cached_till
            .get(key)
            .copied()
            .unwrap_or(0)
    }

    /// Sets the `cached_till` watermark of `key`.
    pub async fn set_cached_till(&self, key: &DatasetKey, time: i64) {
        self.watermarks
            .write()
            .await
            .cached_till
            .insert(key.clone(), time);
    }

    /// Forgets the `cached_till` watermark of `key`.
    pub async fn clear_cached_till(&self, key: &DatasetKey) {
        self.watermarks.write().await.cached_till.remove(key);
    }

    /// Reads `key` from the cache on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored dataset cannot be read.
    pub async fn fetch_cached(&self, key: &DatasetKey) -> Result<Option<Dataset>> {
        let key = key.clone();
        Ok(self.on_cache(move |cache| cache.fetch(&key)).await??)
    }

    /// Writes `dataset` under `key` on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be written.
    pub async fn store_cached(
        &self,
        key: &DatasetKey,
        dataset: Dataset,
        overwrite: bool,
    ) -> Result<bool> {
        let key = key.clone();
        Ok(self
            .on_cache(move |cache| cache.store(&key, &dataset, overwrite))
            .await??)
    }

    /// Returns true if the cache holds a dataset for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup task fails.
    pub async fn is_cached(&self, key: &DatasetKey) -> Result<bool> {
        let key = key.clone();
        self.on_cache(move |cache| cache.exists(&key)).await
    }

    // Cache implementations do file I/O and JSON encoding.
    async fn on_cache<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn DatasetCache) -> T + Send + 'static,
        T: Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || op(cache.as_ref()))
            .await
            .map_err(|e| EngineError::Task(e.to_string()))
    }
}
