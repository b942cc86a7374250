//! Live feed consumer.
//!
//! One task owns the feed socket for the life of the process. It subscribes
//! to the tick channel, answers idle periods with heartbeats and reconnects
//! with backoff when the connection drops. Every trade is folded into the
//! resident 1-minute dataset of its symbol.

use coinbars_fetch::protocol::{HEARTBEAT, SUBSCRIBE_REQUEST};
use coinbars_fetch::parse_feed_line;
use coinbars_types::{Dataset, DatasetKey, Interval, Tick};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{EngineState, FeedConfig, FeedError};

/// Connection state of the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Opening the socket; `attempt` counts failures since the last session.
    Connecting {
        /// Failed attempts so far.
        attempt: u32,
    },
    /// Subscription sent, waiting for data.
    Subscribed,
    /// Receiving lines.
    Reading,
    /// Read timed out, heartbeat sent.
    Idle,
    /// The consumer has stopped.
    Stopped,
}

/// What happened to one live trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Zero volume.
    NotATrade,
    /// The symbol is not in the directory.
    UnknownSymbol,
    /// Older than the symbol's `last_tick`.
    Stale,
    /// Watermark advanced; no 1-minute dataset is resident.
    Recorded,
    /// Merged into the open 1-minute bar.
    Merged,
    /// Opened a new 1-minute bar.
    Appended,
    /// Falls into a bucket before the open bar.
    Late,
}

/// Applies one live trade for the upper-case `symbol`.
///
/// Runs inside the symbol's 1-minute critical section. Only trades strictly
/// older than the symbol's `last_tick` are stale; equal timestamps are kept.
pub async fn apply_tick(state: &EngineState, symbol: &str, tick: Tick) -> TickOutcome {
    if !tick.is_trade() {
        return TickOutcome::NotATrade;
    }

    let mut slot = state.registry.lock(&DatasetKey::finest(symbol)).await;

    {
        let mut watermarks = state.watermarks.write().await;
        let Some(last_tick) = watermarks.last_tick.get_mut(symbol) else {
            return TickOutcome::UnknownSymbol;
        };
        if tick.time < *last_tick {
            return TickOutcome::Stale;
        }
        *last_tick = tick.time;
    }

    slot.as_mut()
        .map_or(TickOutcome::Recorded, |dataset| merge_tick(dataset, &tick))
}

/// Folds `tick` into the last bar of a 1-minute dataset.
fn merge_tick(dataset: &mut Dataset, tick: &Tick) -> TickOutcome {
    let bucket = Interval::FINEST.bucket_start(tick.time);
    match dataset.last_mut() {
        Some(last) if last.time == bucket => {
            last.merge(&tick.as_bar());
            TickOutcome::Merged
        }
        Some(last) if last.time > bucket => TickOutcome::Late,
        _ => match dataset.push(tick.as_bar().at(bucket)) {
            Ok(()) => TickOutcome::Appended,
            Err(_) => TickOutcome::Late,
        },
    }
}

/// Handle to the running feed task.
#[derive(Debug)]
pub struct LiveFeedHandle {
    task: JoinHandle<Result<(), FeedError>>,
    state: watch::Receiver<FeedState>,
}

impl LiveFeedHandle {
    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> FeedState {
        if self.task.is_finished() {
            return FeedState::Stopped;
        }
        *self.state.borrow()
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.clone()
    }

    /// Returns true if the task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the feed task.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Waits for the task to end.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the feed.
    pub async fn join(self) -> Result<(), FeedError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(FeedError::Task(e.to_string())),
        }
    }
}

/// Live feed consumer.
#[derive(Debug)]
pub struct LiveFeed {
    state: Arc<EngineState>,
    config: FeedConfig,
    status: watch::Sender<FeedState>,
}

impl LiveFeed {
    /// Starts the consumer on a new task.
    #[must_use]
    pub fn spawn(state: Arc<EngineState>) -> LiveFeedHandle {
        let config = state.config.feed.clone();
        let (status, receiver) = watch::channel(FeedState::Connecting { attempt: 0 });
        let feed = Self {
            state,
            config,
            status,
        };
        LiveFeedHandle {
            task: tokio::spawn(feed.run()),
            state: receiver,
        }
    }

    async fn run(self) -> Result<(), FeedError> {
        let result = self.run_sessions().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "live feed stopped");
        }
        self.status.send_replace(FeedState::Stopped);
        result
    }

    async fn run_sessions(&self) -> Result<(), FeedError> {
        let policy = self.config.reconnect;
        let mut failures = 0u32;
        loop {
            self.status
                .send_replace(FeedState::Connecting { attempt: failures });
            let stream = match TcpStream::connect(&self.config.addr).await {
                Ok(stream) => stream,
                Err(e) => {
                    if !policy.allows(failures) {
                        return Err(FeedError::Connect {
                            addr: self.config.addr.clone(),
                            attempts: failures + 1,
                            source: e,
                        });
                    }
                    failures += 1;
                    let delay = policy.delay(failures);
                    tracing::warn!(attempt = failures, delay_ms = delay.as_millis() as u64, error = %e, "feed connect failed");
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };

            failures = 0;
            tracing::info!(addr = %self.config.addr, "feed connected");
            self.state.reset_last_ticks().await;

            match self.session(stream).await {
                Ok(lines) => tracing::info!(lines, "feed closed by server"),
                Err(e) => tracing::warn!(error = %e, "feed connection lost"),
            }
            tokio::time::sleep(policy.delay(0)).await;
        }
    }

    /// Runs one connection until EOF or an I/O error. Returns the number of
    /// lines read.
    ///
    /// Lines are decoded lossily, so invalid UTF-8 only costs that line.
    async fn session(&self, stream: TcpStream) -> std::io::Result<u64> {
        let (reader, mut writer) = stream.into_split();
        writer.write_all(SUBSCRIBE_REQUEST.as_bytes()).await?;
        self.status.send_replace(FeedState::Subscribed);

        let mut reader = BufReader::new(reader);
        // Survives a read timeout; a partial line stays buffered.
        let mut buf = Vec::new();
        let mut count = 0u64;
        loop {
            match tokio::time::timeout(self.config.read_timeout, reader.read_until(b'\n', &mut buf))
                .await
            {
                Err(_) => {
                    self.status.send_replace(FeedState::Idle);
                    writer.write_all(HEARTBEAT.as_bytes()).await?;
                }
                Ok(Ok(0)) => return Ok(count),
                Ok(Ok(_)) => {
                    count += 1;
                    self.status.send_replace(FeedState::Reading);
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    buf.clear();
                    self.handle_line(&line).await;
                }
                Ok(Err(e)) => return Err(e),
            }
        }
    }

    async fn handle_line(&self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let message = match parse_feed_line(line) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "skipping feed line");
                return;
            }
        };
        let (symbol, tick) = match message.into_tick() {
            Ok(Some(trade)) => trade,
            Ok(None) => return,
            Err(e) => {
                tracing::debug!(error = %e, "skipping feed tick");
                return;
            }
        };
        let outcome = apply_tick(&self.state, &symbol, tick).await;
        tracing::trace!(symbol = %symbol, time = tick.time, ?outcome, "live tick");
    }
}
