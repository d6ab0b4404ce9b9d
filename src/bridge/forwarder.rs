//! Discord -> Minecraft delivery with reaction feedback.

use tracing::{debug, error, info, warn};

use crate::bridge::platform::DeliveryMarker;
use crate::common::error::DiscordError;
use crate::common::{DeliveryOutcome, OutboundChatMessage};
use crate::hermes::client::CHAT_SEND_PATH;
use crate::hermes::HermesClient;

/// Posts Discord chat to the Hermes API.
#[derive(Debug, Clone)]
pub struct OutboundForwarder {
    client: HermesClient,
}

impl OutboundForwarder {
    pub fn new(client: HermesClient) -> Self {
        Self { client }
    }

    /// Send `message` and mark the originating Discord message with the outcome.
    pub async fn forward(
        &self,
        message: &OutboundChatMessage,
        marker: &dyn DeliveryMarker,
    ) -> DeliveryOutcome {
        info!(
            "Discord -> Minecraft: [{}] {}",
            message.sender_label, message.message
        );

        let outcome = match self.client.send_chat(message).await {
            Ok(()) => {
                info!("Message delivered to {}", self.client.url(CHAT_SEND_PATH));
                DeliveryOutcome::Delivered
            }
            Err(e) if e.status().is_some() => {
                error!("Failed to send message to Minecraft: {}", e);
                DeliveryOutcome::Failed
            }
            Err(e) => {
                error!("Error forwarding message to Minecraft: {}", e);
                DeliveryOutcome::Failed
            }
        };

        match marker.mark(outcome).await {
            Ok(()) => {}
            Err(DiscordError::PermissionDenied { message }) => {
                debug!("Cannot add delivery reaction: {}", message);
            }
            Err(e) => warn!("Failed to add delivery reaction: {}", e),
        }

        outcome
    }
}
