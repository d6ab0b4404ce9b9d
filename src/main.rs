//! Hermes Bridge - Discord-Minecraft chat bridge
//!
//! Relays chat and player presence from a Minecraft server's Hermes API
//! into a Discord channel, and Discord chat back into the game.

mod bridge;
mod common;
mod config;
mod discord;
mod hermes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serenity::all::ChannelId;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use bridge::RelayDispatcher;
use common::error::AppError;
use common::EventFamily;
use config::{load_and_validate, BridgeConfig};
use discord::{BridgeHandler, DiscordBot, DiscordChannel};
use hermes::{HermesClient, StreamMonitor};

/// How long monitors get to wind down after shutdown is requested.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Hermes Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_and_validate().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Set DISCORD_BOT_TOKEN and DISCORD_CHANNEL_ID (and optionally HERMES_API_BASE_URL, HERMES_API_KEY).");
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Hermes API: {}", config.hermes.base_url);
    info!("  API key: {}", if config.hermes.api_key.is_some() { "set" } else { "not set" });
    info!("  Discord channel: {}", config.discord.channel_id);
    info!("  Command prefix: {}", config.discord.command_prefix);

    run(config).await?;

    info!("Exiting...");
    Ok(())
}

async fn run(config: BridgeConfig) -> Result<(), AppError> {
    let hermes = HermesClient::new(&config.hermes)?;
    let bot = DiscordBot::build(&config.discord.token).await?;

    let sink = Arc::new(DiscordChannel::new(
        bot.http(),
        ChannelId::new(config.discord.channel_id),
    ));
    let dispatcher = Arc::new(RelayDispatcher::new(&config, sink));
    let shutdown = CancellationToken::new();

    // ============================================================
    // Spawn stream monitors
    // ============================================================
    let feed = Arc::new(hermes.clone());
    let mut stream_states = Vec::new();
    let mut monitors = Vec::new();
    for family in [EventFamily::Presence, EventFamily::Chat] {
        let monitor = StreamMonitor::new(family, feed.clone(), dispatcher.clone());
        stream_states.push(monitor.state());
        monitors.push(tokio::spawn(monitor.run(shutdown.clone())));
    }

    // ============================================================
    // Start Discord bot
    // ============================================================
    info!("Starting Discord bot...");
    let handler = BridgeHandler::new(&config, dispatcher.clone(), hermes.clone());
    let mut discord_task = tokio::spawn(bot.run(handler, stream_states, shutdown.clone()));

    let discord_finished = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - stopping bridge...");
            false
        }
        _ = &mut discord_task => {
            warn!("Discord task ended unexpectedly");
            true
        }
    };

    // Handle graceful shutdown
    shutdown.cancel();

    let monitors_done = futures::future::join_all(monitors);
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, monitors_done).await {
        Ok(results) => {
            for result in results {
                if let Err(e) = result {
                    warn!("Stream monitor task panicked: {}", e);
                }
            }
            info!("Stream monitors stopped");
        }
        Err(_) => warn!("Stream monitors did not stop in time"),
    }

    if !discord_finished {
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, discord_task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Discord task panicked: {}", e),
            Err(_) => warn!("Discord shutdown timed out"),
        }
    }

    // Last references to the HTTP connection pool.
    drop(dispatcher);
    drop(feed);
    drop(hermes);
    info!("Hermes API client closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
