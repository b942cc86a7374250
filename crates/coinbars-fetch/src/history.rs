//! Trade history download.

use coinbars_types::Tick;

use crate::{FetchError, LineSource, parse_history_line, url::history_url};

/// Trades read from one history request.
#[derive(Debug, Clone, Default)]
pub struct HistoryBatch {
    /// Trades in ascending time order, zero-amount records removed.
    pub ticks: Vec<Tick>,
    /// Number of lines that could not be parsed.
    pub skipped_lines: usize,
}

impl HistoryBatch {
    /// Returns true if the batch holds no trades.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Returns the number of trades.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns the time of the newest trade.
    #[must_use]
    pub fn last_time(&self) -> Option<i64> {
        self.ticks.last().map(|t| t.time)
    }
}

/// Downloads the trade history of `symbol` from `since_ms` onwards.
///
/// Reading stops at the first trade later than `till_ms` when a positive
/// cut-off is given, so the result never overlaps data owned by the live
/// feed. Malformed lines are skipped and counted.
///
/// # Arguments
///
/// * `source` - Line source performing the GET
/// * `base` - History endpoint base URL
/// * `symbol` - Canonical symbol
/// * `since_ms` - First time of interest (epoch ms, truncated to seconds)
/// * `till_ms` - Cut-off (epoch ms); `0` reads to the end
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn fetch_history(
    source: &dyn LineSource,
    base: &str,
    symbol: &str,
    since_ms: i64,
    till_ms: i64,
) -> Result<HistoryBatch, FetchError> {
    let url = history_url(base, symbol, since_ms.div_euclid(1000));
    let lines = source.get_lines(&url).await?;

    let mut batch = HistoryBatch::default();
    for line in &lines {
        if line.trim().is_empty() {
            continue;
        }
        let tick = match parse_history_line(line) {
            Ok(tick) => tick,
            Err(e) => {
                tracing::debug!(symbol, error = %e, "skipping history line");
                batch.skipped_lines += 1;
                continue;
            }
        };
        if !tick.is_trade() {
            continue;
        }
        if till_ms > 0 && tick.time > till_ms {
            break;
        }
        batch.ticks.push(tick);
    }

    tracing::debug!(
        symbol,
        ticks = batch.len(),
        skipped = batch.skipped_lines,
        "history fetched"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        body: &'static str,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LineSource for Canned {
        async fn get_lines(&self, url: &str) -> Result<Vec<String>, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.body.lines().map(String::from).collect())
        }
    }

    fn canned(body: &'static str) -> Canned {
        Canned {
            body,
            requested: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_fetch_history_filters_and_cuts_off() {
        let source = canned("100,10.0,1\n110,11.0,0\nbad line\n120,12.0,2\n200,13.0,1\n");

        let batch = fetch_history(&source, "http://h/t.csv", "abcUSD", 100_500, 150_000)
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.skipped_lines, 1);
        assert_eq!(batch.last_time(), Some(120_000));
        assert_eq!(
            source.requested.lock().unwrap()[0],
            "http://h/t.csv?symbol=abcUSD&start=100"
        );
    }

    #[tokio::test]
    async fn test_fetch_history_without_cutoff_reads_everything() {
        let source = canned("100,10.0,1\n200,13.0,1\n");
        let batch = fetch_history(&source, "http://h/t.csv", "abcUSD", 0, 0)
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[tokio::test]
    async fn test_cutoff_is_inclusive() {
        let source = canned("100,10.0,1\n150,13.0,1\n");
        let batch = fetch_history(&source, "http://h/t.csv", "abcUSD", 0, 150_000)
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
    }
}
