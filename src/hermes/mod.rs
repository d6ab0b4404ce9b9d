//! Hermes server API integration.
//!
//! The Hermes API fronts the Minecraft server: REST endpoints for player
//! queries and chat, server-sent-event streams for presence and chat.

pub mod client;
pub mod monitor;
pub mod parser;
pub mod queries;

#[cfg(test)]
pub mod testing;

pub use client::HermesClient;
pub use monitor::StreamMonitor;
pub use queries::{PlayersReport, StatusReport};
