//! Small shared value types.

use std::fmt;

/// Connection lifecycle of a stream monitor.
///
/// Cycles `Disconnected -> Connecting -> Streaming -> Disconnected` until
/// the process shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Streaming,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Streaming => "streaming",
        };
        f.write_str(name)
    }
}

/// The two event families published by the Hermes API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFamily {
    /// Player join/leave notifications.
    Presence,
    /// In-game chat.
    Chat,
}

impl EventFamily {
    /// Subscription endpoint path for this family.
    pub fn stream_path(&self) -> &'static str {
        match self {
            EventFamily::Presence => "/players/connections",
            EventFamily::Chat => "/chat/stream",
        }
    }
}

impl fmt::Display for EventFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFamily::Presence => f.write_str("presence"),
            EventFamily::Chat => f.write_str("chat"),
        }
    }
}
