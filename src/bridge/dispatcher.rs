//! Relay decisions in both directions.
//!
//! Minecraft -> Discord: parsed stream events become channel notices,
//! except chat the bridge itself sent (loop prevention) and empty lines.
//! Discord -> Minecraft: messages in the bridged channel become
//! [`OutboundChatMessage`]s unless they are our own or a bot command.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::bridge::filter::MessageFilter;
use crate::bridge::platform::NoticeSink;
use crate::common::{
    InboundMessage, OutboundChatMessage, PresenceKind, RelayNotice, StreamEvent,
};
use crate::config::BridgeConfig;

/// Decides what crosses the bridge and posts Minecraft events to Discord.
pub struct RelayDispatcher {
    sink: Arc<dyn NoticeSink>,
    filter: MessageFilter,
    channel_id: u64,
    command_prefix: String,
}

impl RelayDispatcher {
    pub fn new(config: &BridgeConfig, sink: Arc<dyn NoticeSink>) -> Self {
        let filter = MessageFilter::from_config(config.filters.as_ref());
        if filter.is_active() {
            info!("Message filtering enabled");
        }
        Self {
            sink,
            filter,
            channel_id: config.discord.channel_id,
            command_prefix: config.discord.command_prefix.clone(),
        }
    }

    /// The notice to post for a stream event, if any.
    pub fn route_event(&self, event: &StreamEvent) -> Option<RelayNotice> {
        let notice = match event {
            StreamEvent::Presence(presence) => match presence.kind {
                PresenceKind::Joined => RelayNotice::PlayerJoined {
                    player: presence.player_name.clone(),
                },
                PresenceKind::Left => RelayNotice::PlayerLeft {
                    player: presence.player_name.clone(),
                },
            },
            StreamEvent::Chat(chat) => {
                if chat.message.is_empty() {
                    debug!("Dropping empty chat line from {}", chat.player_name);
                    return None;
                }
                if chat.is_relayed_from_discord() {
                    debug!("Dropping relayed chat from {}", chat.player_name);
                    return None;
                }
                let notice = RelayNotice::Chat {
                    player: chat.player_name.clone(),
                    message: chat.message.clone(),
                };
                // Only chat is filtered; presence always goes through.
                if self.filter.blocks(&notice.to_string()) {
                    info!("FILTERED Minecraft -> Discord: {}", notice);
                    return None;
                }
                notice
            }
            StreamEvent::Unparsed(reason) => {
                debug!("Dropping unparsed event: {}", reason);
                return None;
            }
        };

        Some(notice)
    }

    /// Route and post a stream event. Post failures are logged, not returned.
    pub async fn relay_event(&self, event: StreamEvent) {
        let Some(notice) = self.route_event(&event) else {
            return;
        };

        match self.sink.post_notice(&notice).await {
            Ok(()) => info!("Minecraft -> Discord: {}", notice),
            Err(e) => error!("Failed to post to Discord channel {}: {}", self.channel_id, e),
        }
    }

    /// Post a notice that did not come from a stream (e.g. the startup notice).
    pub async fn announce(&self, notice: RelayNotice) {
        if let Err(e) = self.sink.post_notice(&notice).await {
            error!("Failed to post to Discord channel {}: {}", self.channel_id, e);
        }
    }

    /// True if `content` is addressed to the bot rather than the game.
    pub fn is_command(&self, content: &str) -> bool {
        content.trim_start().starts_with(&self.command_prefix)
    }

    /// The message to send to Minecraft for a Discord message, if eligible.
    pub fn route_inbound(
        &self,
        message: &InboundMessage,
        own_user_id: u64,
    ) -> Option<OutboundChatMessage> {
        if message.author_id == own_user_id {
            return None;
        }
        if message.channel_id != self.channel_id {
            return None;
        }
        if self.is_command(&message.content) {
            return None;
        }

        // Build the message content including attachments
        let mut content = message.content.trim().to_string();
        for url in &message.attachments {
            if !content.is_empty() {
                content.push(' ');
            }
            content.push_str(url);
        }

        if content.is_empty() {
            debug!("Ignoring empty Discord message from {}", message.author_name);
            return None;
        }

        if self.filter.blocks(&content) {
            info!("FILTERED Discord -> Minecraft: {}", content);
            return None;
        }

        Some(OutboundChatMessage::from_discord(&message.author_name, content))
    }
}
