//! Common utilities and types shared across the application.

pub mod error;
pub mod messages;
pub mod types;

// Re-export message types from messages module
pub use messages::{
    ChatEvent, DeliveryOutcome, InboundMessage, OutboundChatMessage, PresenceEvent, PresenceKind,
    RelayNotice, StreamEvent,
};
pub use types::{ConnectionState, EventFamily};
