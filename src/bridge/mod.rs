//! Relay logic between Discord and the Minecraft server.
//!
//! ## Module Structure
//!
//! - `dispatcher`: decides what crosses the bridge (`RelayDispatcher`)
//! - `forwarder`: Discord -> Minecraft delivery (`OutboundForwarder`)
//! - `filter`: regex message filter
//! - `platform`: traits the chat platform implements

pub mod dispatcher;
pub mod filter;
pub mod forwarder;
pub mod platform;

#[cfg(test)]
pub mod testing;

// Re-export main types for convenience
pub use dispatcher::RelayDispatcher;
pub use forwarder::OutboundForwarder;
pub use platform::{DeliveryMarker, NoticeSink};
