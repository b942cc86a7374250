//! Engine configuration.

use coinbars_fetch::{ClientConfig, RetryPolicy, url};
use coinbars_store::FileCache;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the live feed consumer.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed socket address (`host:port`).
    pub addr: String,
    /// Idle time after which a heartbeat is sent.
    pub read_timeout: Duration,
    /// Backoff applied between reconnect attempts.
    pub reconnect: RetryPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            addr: url::FEED_ADDR.to_string(),
            read_timeout: Duration::from_secs(10),
            reconnect: RetryPolicy::default(),
        }
    }
}

impl FeedConfig {
    /// Sets the feed address.
    #[must_use]
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    /// Sets the heartbeat timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Sets the reconnect policy.
    #[must_use]
    pub const fn with_reconnect(mut self, reconnect: RetryPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Market list endpoint.
    pub markets_url: String,
    /// Trade history endpoint base.
    pub history_url: String,
    /// Live feed settings.
    pub feed: FeedConfig,
    /// HTTP client settings.
    pub client: ClientConfig,
    /// Directory holding the dataset cache.
    pub cache_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            markets_url: url::MARKETS_URL.to_string(),
            history_url: url::HISTORY_URL.to_string(),
            feed: FeedConfig::default(),
            client: ClientConfig::default(),
            cache_dir: FileCache::default_path(),
        }
    }
}

impl EngineConfig {
    /// Sets the market list endpoint.
    #[must_use]
    pub fn with_markets_url(mut self, markets_url: impl Into<String>) -> Self {
        self.markets_url = markets_url.into();
        self
    }

    /// Sets the trade history endpoint base.
    #[must_use]
    pub fn with_history_url(mut self, history_url: impl Into<String>) -> Self {
        self.history_url = history_url.into();
        self
    }

    /// Sets the live feed settings.
    #[must_use]
    pub fn with_feed(mut self, feed: FeedConfig) -> Self {
        self.feed = feed;
        self
    }

    /// Sets the HTTP client settings.
    #[must_use]
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Sets the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }
}
