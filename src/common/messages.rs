//! Canonical message types for bridge communication.
//!
//! This module defines the single source of truth for the events and
//! messages flowing between Discord and the Minecraft server.

use std::fmt;

use serde::Serialize;

/// Prefix attached to every sender relayed from Discord.
///
/// Chat events whose player name starts with this marker were produced by
/// the bridge itself and must never be relayed back.
pub const FORWARD_MARKER: &str = "[Discord]";

/// Whether a player joined or left the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Joined,
    Left,
}

/// A join/leave notification from the presence stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    pub player_name: String,
    pub kind: PresenceKind,
}

/// A chat line from the chat stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub player_name: String,
    pub message: String,
}

impl ChatEvent {
    /// True if this event was produced by the bridge forwarding Discord chat.
    pub fn is_relayed_from_discord(&self) -> bool {
        self.player_name.starts_with(FORWARD_MARKER)
    }
}

/// Result of parsing one raw event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Presence(PresenceEvent),
    Chat(ChatEvent),
    /// Payload could not be understood; carries the reason for logging.
    Unparsed(String),
}

/// Chat message sent from Discord to the game server.
///
/// Serializes to the `{sender, message}` body of `POST /chat/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundChatMessage {
    #[serde(rename = "sender")]
    pub sender_label: String,
    pub message: String,
}

impl OutboundChatMessage {
    /// Build a message on behalf of a Discord user, tagging it with the marker.
    pub fn from_discord(display_name: &str, message: impl Into<String>) -> Self {
        Self {
            sender_label: format!("{} {}", FORWARD_MARKER, display_name),
            message: message.into(),
        }
    }
}

/// Message from Discord as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Discord user ID of the author.
    pub author_id: u64,
    /// Author's effective display name (nickname, global name or username).
    pub author_name: String,
    /// Discord channel ID the message was posted in.
    pub channel_id: u64,
    /// Message content.
    pub content: String,
    /// URLs of attached files.
    pub attachments: Vec<String>,
}

/// Notice posted to the Discord channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayNotice {
    PlayerJoined { player: String },
    PlayerLeft { player: String },
    Chat { player: String, message: String },
    /// Posted once the Discord gateway is ready.
    BridgeOnline,
}

impl fmt::Display for RelayNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayNotice::PlayerJoined { player } => write!(f, "{} joined the server", player),
            RelayNotice::PlayerLeft { player } => write!(f, "{} left the server", player),
            RelayNotice::Chat { player, message } => write!(f, "{}: {}", player, message),
            RelayNotice::BridgeOnline => write!(f, "Bridge is now monitoring the Minecraft server!"),
        }
    }
}

/// Outcome of forwarding a Discord message to the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

impl DeliveryOutcome {
    /// Reaction emoji shown on the originating Discord message.
    pub fn reaction(&self) -> char {
        match self {
            DeliveryOutcome::Delivered => '✅',
            DeliveryOutcome::Failed => '❌',
        }
    }
}
