//! Discord bot integration.
//!
//! This module provides the Discord side of the bridge: the gateway
//! client, message handling, commands and the channel sink.

pub mod client;
pub mod commands;
pub mod handler;
pub mod sink;

// Re-export main types for external use
pub use client::DiscordBot;
pub use handler::BridgeHandler;
pub use sink::DiscordChannel;
