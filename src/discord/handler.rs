//! Discord message event handling.
//!
//! Turns gateway events into bridge actions: the startup notice, bot
//! commands, Discord -> Minecraft forwarding and the bot's presence.

use std::sync::Arc;

use serenity::all::{ActivityData, ChannelId, Context, CreateMessage, Message, OnlineStatus, Ready};
use tracing::{debug, error, info};

use crate::bridge::{OutboundForwarder, RelayDispatcher};
use crate::common::{ConnectionState, InboundMessage, RelayNotice};
use crate::config::BridgeConfig;
use crate::discord::commands::{help_view, parse_command, players_view, status_view, BotCommand};
use crate::discord::sink::MessageReaction;
use crate::hermes::{queries, HermesClient};

/// Discord event handler.
pub struct BridgeHandler {
    dispatcher: Arc<RelayDispatcher>,
    forwarder: OutboundForwarder,
    hermes: HermesClient,
    channel_id: ChannelId,
    command_prefix: String,
    /// The startup notice goes out once, not on every gateway resume.
    announced: bool,
}

impl BridgeHandler {
    pub fn new(config: &BridgeConfig, dispatcher: Arc<RelayDispatcher>, hermes: HermesClient) -> Self {
        Self {
            dispatcher,
            forwarder: OutboundForwarder::new(hermes.clone()),
            hermes,
            channel_id: ChannelId::new(config.discord.channel_id),
            command_prefix: config.discord.command_prefix.clone(),
            announced: false,
        }
    }

    pub async fn handle_ready(&mut self, ready: &Ready) {
        info!("Discord bot connected as {}", ready.user.name);
        info!("Monitoring channel {}", self.channel_id);

        if !self.announced {
            self.dispatcher.announce(RelayNotice::BridgeOnline).await;
            self.announced = true;
        }
    }

    pub async fn handle_message(&self, ctx: &Context, msg: Message) {
        let own_id = ctx.cache.current_user().id;
        if msg.author.id == own_id {
            return;
        }
        if msg.channel_id != self.channel_id {
            return;
        }

        if self.dispatcher.is_command(&msg.content) {
            match parse_command(&self.command_prefix, &msg.content) {
                Some(command) => self.spawn_command(ctx, &msg, command),
                None => debug!("Unknown command from {}: {}", msg.author.name, msg.content),
            }
            return;
        }

        let inbound = inbound_message(&msg);
        let Some(outbound) = self.dispatcher.route_inbound(&inbound, own_id.get()) else {
            return;
        };

        let marker = MessageReaction::new(ctx.http.clone(), msg.channel_id, msg.id);
        self.forwarder.forward(&outbound, &marker).await;
    }

    /// Commands run on their own task so a slow API does not hold up chat.
    fn spawn_command(&self, ctx: &Context, msg: &Message, command: BotCommand) {
        let hermes = self.hermes.clone();
        let http = ctx.http.clone();
        let channel_id = msg.channel_id;
        let prefix = self.command_prefix.clone();
        let author = msg.author.name.clone();

        tokio::spawn(async move {
            info!("Command {:?} from {}", command, author);
            let view = match command {
                BotCommand::Players => players_view(&queries::online_players(&hermes).await),
                BotCommand::Status => status_view(&queries::server_status(&hermes).await),
                BotCommand::Help => help_view(&prefix),
            };

            let reply = CreateMessage::new().embed(view.to_embed());
            if let Err(e) = channel_id.send_message(&http, reply).await {
                error!("Failed to send command response: {}", e);
            }
        });
    }

    /// Reflect stream health in the bot's Discord presence.
    pub fn handle_stream_states(&self, ctx: &Context, states: &[ConnectionState]) {
        let overall = overall_state(states);
        debug!("Stream state changed: {}", overall);

        let (activity, status) = match overall {
            ConnectionState::Streaming => (ActivityData::watching("the Minecraft server"), OnlineStatus::Online),
            ConnectionState::Connecting => (ActivityData::custom("Connecting to the Minecraft server..."), OnlineStatus::Idle),
            ConnectionState::Disconnected => (ActivityData::custom("Minecraft server unreachable"), OnlineStatus::DoNotDisturb),
        };
        ctx.set_presence(Some(activity), status);
    }
}

/// Snapshot of a Discord message in platform-neutral form.
pub fn inbound_message(msg: &Message) -> InboundMessage {
    let nick = msg.member.as_ref().and_then(|m| m.nick.as_deref());
    InboundMessage {
        author_id: msg.author.id.get(),
        author_name: display_name(nick, msg.author.global_name.as_deref(), &msg.author.name),
        channel_id: msg.channel_id.get(),
        content: msg.content.clone(),
        attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
    }
}

/// Server nickname, then global display name, then username.
pub fn display_name(nick: Option<&str>, global_name: Option<&str>, username: &str) -> String {
    nick.or(global_name).unwrap_or(username).to_string()
}

/// The worst state across all streams.
pub fn overall_state(states: &[ConnectionState]) -> ConnectionState {
    if states.contains(&ConnectionState::Disconnected) {
        ConnectionState::Disconnected
    } else if states.contains(&ConnectionState::Connecting) {
        ConnectionState::Connecting
    } else if states.is_empty() {
        ConnectionState::Disconnected
    } else {
        ConnectionState::Streaming
    }
}
