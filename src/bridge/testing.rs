//! Recording platform fakes for tests.

use std::sync::{Arc, Mutex};

use serenity::async_trait;
use tokio::sync::Notify;

use crate::bridge::platform::{DeliveryMarker, NoticeSink};
use crate::common::error::{DiscordError, DiscordResult};
use crate::common::{DeliveryOutcome, RelayNotice};

/// Records every posted notice.
#[derive(Default)]
pub struct RecordingSink {
    posted: Mutex<Vec<RelayNotice>>,
    posted_signal: Notify,
    failing: bool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A sink whose every post fails (the attempt is still recorded).
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: true,
            ..Self::default()
        })
    }

    pub fn posted(&self) -> Vec<RelayNotice> {
        self.posted.lock().unwrap().clone()
    }

    /// Wait until at least `count` notices have been posted.
    pub async fn wait_for(&self, count: usize) -> Vec<RelayNotice> {
        loop {
            let notified = self.posted_signal.notified();
            let posted = self.posted();
            if posted.len() >= count {
                return posted;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl NoticeSink for RecordingSink {
    async fn post_notice(&self, notice: &RelayNotice) -> DiscordResult<()> {
        self.posted.lock().unwrap().push(notice.clone());
        self.posted_signal.notify_waiters();
        if self.failing {
            return Err(DiscordError::PermissionDenied {
                message: "cannot send messages in this channel".to_string(),
            });
        }
        Ok(())
    }
}

/// Records delivery outcomes; optionally denies permission like a
/// channel where the bot may not add reactions.
#[derive(Default)]
pub struct RecordingMarker {
    marks: Mutex<Vec<DeliveryOutcome>>,
    deny: bool,
}

impl RecordingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    pub fn marks(&self) -> Vec<DeliveryOutcome> {
        self.marks.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryMarker for RecordingMarker {
    async fn mark(&self, outcome: DeliveryOutcome) -> DiscordResult<()> {
        if self.deny {
            return Err(DiscordError::PermissionDenied {
                message: "Missing Permissions".to_string(),
            });
        }
        self.marks.lock().unwrap().push(outcome);
        Ok(())
    }
}
