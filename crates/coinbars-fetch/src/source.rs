//! Line-oriented GET abstraction.

use async_trait::async_trait;

use crate::FetchError;

/// Source of line-oriented HTTP bodies.
///
/// Implemented by [`HttpClient`](crate::HttpClient); tests substitute canned
/// responses.
#[async_trait]
pub trait LineSource: Send + Sync {
    /// Fetches `url` and returns the response body split into lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after any retries.
    async fn get_lines(&self, url: &str) -> Result<Vec<String>, FetchError>;
}
