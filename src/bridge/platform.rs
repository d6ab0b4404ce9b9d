//! What the bridge needs from the chat platform.
//!
//! The Discord implementations live in `discord::sink`; tests use the
//! recording fakes in `bridge::testing`.

use serenity::async_trait;

use crate::common::error::DiscordResult;
use crate::common::{DeliveryOutcome, RelayNotice};

/// Posts notices to the bridged channel.
#[async_trait]
pub trait NoticeSink: Send + Sync {
    async fn post_notice(&self, notice: &RelayNotice) -> DiscordResult<()>;
}

/// Attaches a delivery indicator to one originating message.
///
/// Implementations may fail with `DiscordError::PermissionDenied`; callers
/// treat every failure as cosmetic.
#[async_trait]
pub trait DeliveryMarker: Send + Sync {
    async fn mark(&self, outcome: DeliveryOutcome) -> DiscordResult<()>;
}
