//! Event payload parsing.
//!
//! Presence events arrive as plain text (`"Steve has joined!"`). Chat events
//! arrive either as a JSON object `{"player": .., "message": ..}` or as a
//! plain `"name: message"` line. Both decoders return a [`StreamEvent`]
//! rather than an error so every outcome can be matched exhaustively.

use serde::Deserialize;

use crate::common::{ChatEvent, EventFamily, PresenceEvent, PresenceKind, StreamEvent};

const JOINED_SUFFIX: &str = " has joined!";
const LEFT_SUFFIX: &str = " has left.";

/// Player name used when a structured chat event has none.
pub const UNKNOWN_PLAYER: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct ChatPayload {
    #[serde(default = "unknown_player")]
    player: String,
    #[serde(default)]
    message: String,
}

fn unknown_player() -> String {
    UNKNOWN_PLAYER.to_string()
}

/// Parse a payload belonging to `family`.
pub fn parse_event(family: EventFamily, payload: &str) -> StreamEvent {
    match family {
        EventFamily::Presence => parse_presence(payload),
        EventFamily::Chat => parse_chat(payload),
    }
}

/// Parse a join/leave line.
pub fn parse_presence(payload: &str) -> StreamEvent {
    let text = payload.trim();

    let (name, kind) = if let Some(name) = text.strip_suffix(JOINED_SUFFIX) {
        (name, PresenceKind::Joined)
    } else if let Some(name) = text.strip_suffix(LEFT_SUFFIX) {
        (name, PresenceKind::Left)
    } else {
        return StreamEvent::Unparsed(format!("unrecognised presence event: {}", text));
    };

    let name = name.trim();
    if name.is_empty() {
        return StreamEvent::Unparsed(format!("presence event without a player: {}", text));
    }

    StreamEvent::Presence(PresenceEvent {
        player_name: name.to_string(),
        kind,
    })
}

/// Parse a chat line, JSON first and `name: message` text second.
pub fn parse_chat(payload: &str) -> StreamEvent {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value @ serde_json::Value::Object(_)) => {
            return match serde_json::from_value::<ChatPayload>(value) {
                Ok(chat) => StreamEvent::Chat(ChatEvent {
                    player_name: chat.player,
                    message: chat.message,
                }),
                Err(e) => StreamEvent::Unparsed(format!("malformed chat object: {}", e)),
            };
        }
        // Not an object: fall through to the text form.
        Ok(_) | Err(_) => {}
    }

    match payload.split_once(':') {
        Some((name, message)) => StreamEvent::Chat(ChatEvent {
            player_name: name.trim().to_string(),
            message: message.trim().to_string(),
        }),
        None => StreamEvent::Unparsed(format!("chat event without a sender: {}", payload.trim())),
    }
}
