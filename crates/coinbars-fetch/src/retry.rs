//! Exponential backoff retry policy.

use std::future::Future;
use std::time::Duration;

/// Retry policy with capped exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Returns true if another attempt is allowed after `attempts` retries.
    #[must_use]
    pub const fn allows(&self, attempts: u32) -> bool {
        attempts < self.max_retries
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        // base_delay * 2^attempt, capped
        let exp_delay = self.base_delay_ms.saturating_mul(1u64 << attempt.min(10));
        let capped_delay = exp_delay.min(self.max_delay_ms);

        // Deterministic jitter of up to ±25%
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            jitter_offset as i64 - jitter_range as i64
        } else {
            0
        };

        let floor = 100.min(self.max_delay_ms) as i64;
        Duration::from_millis((capped_delay as i64 + jitter).max(floor) as u64)
    }

    /// Runs `op` until it succeeds, the error is not retryable, or the policy
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the last error produced by `op`.
    pub async fn retry<T, E, F, Fut>(
        &self,
        mut op: F,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempts = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if is_retryable(&e) && self.allows(attempts) => {
                    attempts += 1;
                    let delay = self.delay(attempts);
                    tracing::warn!(attempt = attempts, delay_ms = delay.as_millis() as u64, error = %e, "retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
