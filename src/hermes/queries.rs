//! One-shot status and player queries.
//!
//! Single attempt each, no retry; failures become part of the report.

use tracing::{error, info};

use crate::common::error::ApiError;
use crate::hermes::HermesClient;

/// Result of the `status` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// The API answered with a player count.
    Online { count: u32, endpoint: String },
    /// The API answered, but not with HTTP 200.
    Degraded { status: u16 },
    /// No usable answer at all.
    Unreachable { error: String },
}

/// Result of the `players` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayersReport {
    Online { count: u32, names: Vec<String> },
    Unavailable { reason: String },
}

/// Probe `/players/count` once.
pub async fn server_status(client: &HermesClient) -> StatusReport {
    match client.player_count().await {
        Ok(count) => {
            info!("Server status: online with {} players", count);
            StatusReport::Online {
                count,
                endpoint: client.base_url().to_string(),
            }
        }
        Err(ApiError::Status { url, status }) => {
            error!("Status check against {} returned HTTP {}", url, status);
            StatusReport::Degraded { status }
        }
        Err(e) => {
            error!("Status check failed: {}", e);
            StatusReport::Unreachable {
                error: e.to_string(),
            }
        }
    }
}

/// Fetch the player count and names together.
pub async fn online_players(client: &HermesClient) -> PlayersReport {
    let (count, names) = tokio::join!(client.player_count(), client.player_names());

    match (count, names) {
        (Ok(count), Ok(names)) => PlayersReport::Online { count, names },
        (count, names) => {
            let reason = [count.err(), names.err()]
                .into_iter()
                .flatten()
                .map(|e| {
                    error!("Failed to get player information: {}", e);
                    e.to_string()
                })
                .collect::<Vec<_>>()
                .join("; ");
            PlayersReport::Unavailable { reason }
        }
    }
}
