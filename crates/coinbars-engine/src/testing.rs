//! Test doubles shared by the engine's unit tests.

use async_trait::async_trait;
use coinbars_fetch::{FetchError, LineSource};
use coinbars_store::MemoryCache;
use coinbars_types::Symbol;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::{EngineConfig, EngineState, SymbolDirectory};

pub(crate) const MARKETS: &str = "http://test/markets.json";
pub(crate) const HISTORY: &str = "http://test/trades.csv";

/// Line source answering from canned bodies, keyed by URL.
///
/// Unknown URLs return a 503 so that a missing script fails loudly.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    bodies: Mutex<Vec<(String, String)>>,
    requests: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

/// Holds every request until released.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    /// Signalled when a request reaches the gate.
    pub(crate) entered: Notify,
    /// Lets one waiting request through.
    pub(crate) release: Notify,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `url` with `body`, replacing any earlier script for it.
    pub(crate) fn respond(&self, url: impl Into<String>, body: impl Into<String>) {
        let url = url.into();
        let mut bodies = self.bodies.lock().unwrap();
        bodies.retain(|(u, _)| *u != url);
        bodies.push((url, body.into()));
    }

    pub(crate) fn history(&self, symbol: &str, start: i64, body: impl Into<String>) {
        self.respond(format!("{HISTORY}?symbol={symbol}&start={start}"), body);
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Makes every later request wait on the returned gate.
    pub(crate) fn gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl LineSource for ScriptedSource {
    async fn get_lines(&self, url: &str) -> Result<Vec<String>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let bodies = self.bodies.lock().unwrap();
        bodies
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, body)| body.lines().map(String::from).collect())
            .ok_or(FetchError::ServerError { status: 503 })
    }
}

pub(crate) fn config() -> EngineConfig {
    EngineConfig::default()
        .with_markets_url(MARKETS)
        .with_history_url(HISTORY)
}

/// Engine state over an in-memory cache with `symbols` installed.
pub(crate) async fn state(
    source: Arc<ScriptedSource>,
    symbols: &[&str],
) -> (Arc<EngineState>, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let state = Arc::new(EngineState::new(config(), cache.clone(), source));
    state
        .install_directory(SymbolDirectory::from_symbols(
            symbols.iter().map(|s| Symbol::new(*s)),
        ))
        .await;
    (state, cache)
}

/// History CSV body from `(seconds, price, amount)` rows.
pub(crate) fn csv(rows: &[(i64, f64, f64)]) -> String {
    rows.iter()
        .map(|(t, p, a)| format!("{t},{p},{a}\n"))
        .collect()
}
