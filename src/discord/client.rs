//! Discord bot client abstraction.
//!
//! Owns the serenity client, funnels gateway events into a single task and
//! keeps the gateway connected until shutdown.

use std::sync::Arc;
use std::time::Duration;

use backon::BackoffBuilder;
use serenity::all::{Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use serenity::http::Http;
use serenity::Client;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::common::error::DiscordResult;
use crate::common::ConnectionState;
use crate::discord::handler::BridgeHandler;

#[derive(Debug, Clone)]
pub enum DiscordBotEvent {
    /// Bot connected and ready.
    Ready { context: Context, ready: Ready },
    /// Message received.
    Message { context: Context, message: Message },
    Disconnected,
}

struct DiscordBotEvents {
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

#[async_trait]
impl EventHandler for DiscordBotEvents {
    async fn ready(&self, context: Context, ready: Ready) {
        if let Err(error) = self.discord_events_tx.send(DiscordBotEvent::Ready { context, ready }) {
            warn!("Failed to process discord event: {}", error);
        }
    }

    async fn message(&self, context: Context, message: Message) {
        if let Err(error) = self.discord_events_tx.send(DiscordBotEvent::Message { context, message }) {
            warn!("Failed to process discord event: {}", error);
        }
    }
}

async fn build_client(
    token: &str,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
) -> DiscordResult<Client> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let events = DiscordBotEvents { discord_events_tx };
    let client = Client::builder(token, intents).event_handler(events).await?;
    Ok(client)
}

/// Exponential backoff for rebuilding the Discord client.
/// 5s initial, 5min max, factor 1.1, with jitter, unlimited retries.
fn discord_backoff() -> impl Iterator<Item = Duration> {
    backon::ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(5))
        .with_max_delay(Duration::from_secs(300))
        .with_factor(1.1)
        .with_jitter()
        .without_max_times()
        .build()
}

pub struct DiscordBot {
    client: Option<Client>,
    http: Arc<Http>,
    token: String,
    discord_events_rx: mpsc::UnboundedReceiver<DiscordBotEvent>,
    discord_events_tx: mpsc::UnboundedSender<DiscordBotEvent>,
}

impl DiscordBot {
    /// Build the serenity client. Nothing connects until [`DiscordBot::run`].
    pub async fn build(token: &str) -> DiscordResult<Self> {
        let (discord_events_tx, discord_events_rx) = mpsc::unbounded_channel::<DiscordBotEvent>();
        let client = build_client(token, discord_events_tx.clone()).await?;

        Ok(Self {
            http: client.http.clone(),
            client: Some(client),
            token: token.to_string(),
            discord_events_rx,
            discord_events_tx,
        })
    }

    /// REST handle for posting outside of event callbacks.
    pub fn http(&self) -> Arc<Http> {
        self.http.clone()
    }

    /// Run the gateway and the event loop until `shutdown` fires.
    pub async fn run(
        mut self,
        mut handler: BridgeHandler,
        stream_states: Vec<watch::Receiver<ConnectionState>>,
        shutdown: CancellationToken,
    ) {
        let shard_manager = self.client.as_ref().map(|c| c.shard_manager.clone());
        let client = &mut self.client;
        let discord_events_rx = &mut self.discord_events_rx;

        tokio::select! {
            _ = Self::run_connection(client, &self.token, &self.discord_events_tx) => {},
            _ = Self::process_events(discord_events_rx, &mut handler, stream_states) => {},
            _ = shutdown.cancelled() => {
                // Gracefully shutdown Discord gateway
                if let Some(ref manager) = shard_manager {
                    info!("Initiating graceful Discord shutdown...");
                    manager.shutdown_all().await;
                    info!("Discord shutdown complete");
                }
            }
        }
        info!("Discord task ended");
    }

    async fn run_connection(
        client: &mut Option<Client>,
        token: &str,
        discord_events_tx: &mpsc::UnboundedSender<DiscordBotEvent>,
    ) {
        let mut backoff = discord_backoff();

        loop {
            info!("Connecting to Discord...");

            let mut client = match client.take() {
                Some(client) => client,
                None => {
                    // serenity mostly handles reconnections itself.
                    match build_client(token, discord_events_tx.clone()).await {
                        Ok(client) => {
                            backoff = discord_backoff();
                            client
                        }
                        Err(e) => {
                            error!("Failed to rebuild Discord client: {}", e);
                            let delay = backoff.next().unwrap_or(Duration::from_secs(300));
                            warn!("Retrying in {:.1}s...", delay.as_secs_f64());
                            sleep(delay).await;
                            continue;
                        }
                    }
                }
            };

            let result = client.start().await;
            if let Err(error) = discord_events_tx.send(DiscordBotEvent::Disconnected) {
                warn!("Failed to process discord event: {}", error);
            }
            match result {
                Ok(()) => {
                    info!("Discord client disconnected normally");
                    break;
                }
                Err(e) => {
                    error!("Discord client error: {}", e);
                    let delay = backoff.next().unwrap_or(Duration::from_secs(300));
                    warn!(
                        "Discord disconnected. Reconnecting in {:.1}s...",
                        delay.as_secs_f64(),
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    async fn process_events(
        discord_events_rx: &mut mpsc::UnboundedReceiver<DiscordBotEvent>,
        handler: &mut BridgeHandler,
        mut stream_states: Vec<watch::Receiver<ConnectionState>>,
    ) {
        let mut discord_connection: Option<Context> = None;
        let (state_tx, mut state_rx) = mpsc::unbounded_channel::<()>();

        // One watcher per monitor; a closed watch just ends its watcher.
        for mut states in stream_states.iter().cloned() {
            let state_tx = state_tx.clone();
            tokio::spawn(async move {
                while states.changed().await.is_ok() {
                    if state_tx.send(()).is_err() {
                        break;
                    }
                }
            });
        }
        drop(state_tx);

        loop {
            tokio::select! {
                // Discord events
                event = discord_events_rx.recv() => {
                    match event {
                        Some(DiscordBotEvent::Ready { context, ready }) => {
                            handler.handle_ready(&ready).await;
                            handler.handle_stream_states(&context, &current_states(&mut stream_states));
                            discord_connection = Some(context);
                        }
                        Some(DiscordBotEvent::Message { context, message }) => {
                            handler.handle_message(&context, message).await;
                        }
                        Some(DiscordBotEvent::Disconnected) => {
                            discord_connection = None;
                        }
                        None => {
                            debug!("Discord events channel closed.");
                            break;
                        }
                    }
                }

                // Stream state changes (drop if not connected)
                Some(()) = state_rx.recv() => {
                    if let Some(ref context) = discord_connection {
                        handler.handle_stream_states(context, &current_states(&mut stream_states));
                    } else {
                        debug!("Dropping stream state update - Discord not connected");
                    }
                }
            }
        }
    }
}

fn current_states(stream_states: &mut [watch::Receiver<ConnectionState>]) -> Vec<ConnectionState> {
    stream_states
        .iter_mut()
        .map(|states| *states.borrow_and_update())
        .collect()
}
