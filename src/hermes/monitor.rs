//! Long-lived event stream subscriptions.
//!
//! One [`StreamMonitor`] runs per event family. Each keeps its subscription
//! open, feeds payloads through the parser into the dispatcher, and on any
//! failure waits a fixed delay before resubscribing, forever.

use std::sync::Arc;
use std::time::Duration;

use backon::BackoffBuilder;
use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::bridge::RelayDispatcher;
use crate::common::error::{ApiError, ApiResult};
use crate::common::{ConnectionState, EventFamily};
use crate::hermes::client::{EventFeed, FeedEvent};
use crate::hermes::parser::parse_event;

/// Delay between a disconnect and the next subscription attempt.
pub const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Fixed delay, unlimited retries.
fn retry_schedule(delay: Duration) -> impl Iterator<Item = Duration> {
    backon::ConstantBuilder::default()
        .with_delay(delay)
        .without_max_times()
        .build()
}

/// Subscription loop for one event family.
pub struct StreamMonitor<F: EventFeed> {
    family: EventFamily,
    feed: Arc<F>,
    dispatcher: Arc<RelayDispatcher>,
    retry_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
}

impl<F: EventFeed> StreamMonitor<F> {
    pub fn new(family: EventFamily, feed: Arc<F>, dispatcher: Arc<RelayDispatcher>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            family,
            feed,
            dispatcher,
            retry_delay: RETRY_DELAY,
            state_tx,
        }
    }

    /// Watch this monitor's connection state.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Run until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) {
        let path = self.family.stream_path();
        let mut retry = retry_schedule(self.retry_delay);

        loop {
            info!("Connecting to {} event stream {}...", self.family, path);
            self.set_state(ConnectionState::Connecting);

            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = self.stream_once(path) => result,
            };

            self.set_state(ConnectionState::Disconnected);
            if let Err(e) = result {
                error!("{} event stream error: {}", self.family, e);
            }

            let delay = retry.next().unwrap_or(self.retry_delay);
            info!(
                "Retrying {} event stream in {} seconds...",
                self.family,
                delay.as_secs()
            );

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.set_state(ConnectionState::Disconnected);
        info!("{} event monitor stopped", self.family);
    }

    /// Consume one subscription until it fails. Never returns `Ok` with a
    /// live connection; a clean end of stream is reported as `StreamEnded`.
    async fn stream_once(&self, path: &str) -> ApiResult<()> {
        let mut stream = self.feed.subscribe(path)?;

        while let Some(item) = stream.next().await {
            match item? {
                FeedEvent::Open => {
                    info!("{} event stream connected", self.family);
                    self.set_state(ConnectionState::Streaming);
                }
                FeedEvent::Data(payload) => {
                    if payload.trim().is_empty() {
                        continue;
                    }
                    self.set_state(ConnectionState::Streaming);
                    debug!("Received {} event: {}", self.family, payload.trim());
                    let event = parse_event(self.family, &payload);
                    self.dispatcher.relay_event(event).await;
                }
            }
        }

        Err(ApiError::StreamEnded {
            url: self.feed.endpoint(path),
        })
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
