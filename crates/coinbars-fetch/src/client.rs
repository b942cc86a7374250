//! HTTP client for line-oriented exchange endpoints.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::{LineSource, RetryPolicy};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            // Full trade histories are large
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            user_agent: format!("coinbars/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Errors that can occur during fetches.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Response body was not valid UTF-8.
    #[error("Response body is not UTF-8 text")]
    Encoding,
}

impl FetchError {
    /// Determines if an error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            // Don't retry builder errors (configuration issues)
            Self::Http(e) if e.is_builder() => false,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::ServerError { status } => *status >= 500 || *status == 429,
            Self::Encoding => false,
        }
    }
}

/// HTTP client with connection pooling, timeouts and retry logic.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one GET and splits the streamed body into lines.
    async fn get_lines_once(&self, url: &str) -> Result<Vec<String>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
            });
        }

        let mut splitter = LineSplitter::default();
        let mut body = std::pin::pin!(response.bytes_stream());
        while let Some(chunk) = body.next().await {
            splitter.push(&chunk?)?;
        }
        splitter.finish()
    }
}

#[async_trait]
impl LineSource for HttpClient {
    async fn get_lines(&self, url: &str) -> Result<Vec<String>, FetchError> {
        tracing::debug!(url, "GET");
        self.config
            .retry
            .retry(move || self.get_lines_once(url), FetchError::is_retryable)
            .await
    }
}

/// Incremental splitter turning body chunks into lines.
///
/// Lines are split on `\n`; a trailing `\r` is stripped.
#[derive(Debug, Default)]
struct LineSplitter {
    pending: Vec<u8>,
    lines: Vec<String>,
}

impl LineSplitter {
    fn push(&mut self, chunk: &[u8]) -> Result<(), FetchError> {
        self.pending.extend_from_slice(chunk);
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        for line in complete[..complete.len() - 1].split(|&b| b == b'\n') {
            self.lines.push(decode_line(line)?);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<String>, FetchError> {
        if !self.pending.is_empty() {
            let line = decode_line(&self.pending)?;
            self.lines.push(line);
        }
        Ok(self.lines)
    }
}

fn decode_line(line: &[u8]) -> Result<String, FetchError> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8(line.to_vec()).map_err(|_| FetchError::Encoding)
}
