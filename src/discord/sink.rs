//! Serenity-backed implementations of the bridge platform traits.

use std::sync::Arc;

use serenity::all::{ChannelId, CreateMessage, MessageId, ReactionType};
use serenity::async_trait;
use serenity::http::{Http, HttpError};
use serenity::model::ModelError;

use crate::bridge::{DeliveryMarker, NoticeSink};
use crate::common::error::{DiscordError, DiscordResult};
use crate::common::{DeliveryOutcome, RelayNotice};
use crate::discord::commands::notice_view;

/// The configured bridge channel.
#[derive(Clone)]
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl NoticeSink for DiscordChannel {
    async fn post_notice(&self, notice: &RelayNotice) -> DiscordResult<()> {
        let message = CreateMessage::new().embed(notice_view(notice).to_embed());
        self.channel_id
            .send_message(&self.http, message)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

/// Reacts on a single Discord message.
pub struct MessageReaction {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
}

impl MessageReaction {
    pub fn new(http: Arc<Http>, channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            http,
            channel_id,
            message_id,
        }
    }
}

#[async_trait]
impl DeliveryMarker for MessageReaction {
    async fn mark(&self, outcome: DeliveryOutcome) -> DiscordResult<()> {
        let reaction = ReactionType::Unicode(outcome.reaction().to_string());
        self.http
            .create_reaction(self.channel_id, self.message_id, &reaction)
            .await
            .map_err(classify)
    }
}

/// Split permission failures out of other serenity errors.
pub fn classify(error: serenity::Error) -> DiscordError {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(ref response))
            if response.status_code.as_u16() == 403 =>
        {
            DiscordError::PermissionDenied {
                message: response.error.message.clone(),
            }
        }
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
            DiscordError::PermissionDenied {
                message: error.to_string(),
            }
        }
        other => DiscordError::Serenity(other),
    }
}
