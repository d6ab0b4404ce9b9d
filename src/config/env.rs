//! Configuration from environment variables.
//!
//! - `HERMES_API_BASE_URL` - Hermes API base URL (default `http://localhost:8080`)
//! - `HERMES_API_KEY` - Bearer token for the Hermes API (optional)
//! - `DISCORD_BOT_TOKEN` - Discord bot token (required)
//! - `DISCORD_CHANNEL_ID` - Discord channel to bridge (required)
//! - `DISCORD_COMMAND_PREFIX` - Command prefix (default `!mc`)
//! - `BRIDGE_FILTER_PATTERNS` - `;`-separated regex patterns to filter out

use std::env;

use crate::common::error::ConfigError;
use crate::config::types::{
    BridgeConfig, DiscordConfig, FiltersConfig, HermesConfig, DEFAULT_BASE_URL,
    DEFAULT_COMMAND_PREFIX,
};

pub const BASE_URL_VAR: &str = "HERMES_API_BASE_URL";
pub const API_KEY_VAR: &str = "HERMES_API_KEY";
pub const BOT_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";
pub const CHANNEL_ID_VAR: &str = "DISCORD_CHANNEL_ID";
pub const COMMAND_PREFIX_VAR: &str = "DISCORD_COMMAND_PREFIX";
pub const FILTER_PATTERNS_VAR: &str = "BRIDGE_FILTER_PATTERNS";

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<BridgeConfig, ConfigError> {
    load_with(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
///
/// Empty values are treated the same as unset ones.
pub fn load_with<F>(lookup: F) -> Result<BridgeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| {
        lookup(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let token = get(BOT_TOKEN_VAR).ok_or_else(|| ConfigError::MissingVar {
        name: BOT_TOKEN_VAR.to_string(),
    })?;

    let channel_raw = get(CHANNEL_ID_VAR).ok_or_else(|| ConfigError::MissingVar {
        name: CHANNEL_ID_VAR.to_string(),
    })?;
    let channel_id = channel_raw
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            name: CHANNEL_ID_VAR.to_string(),
            message: format!("'{}' is not a channel ID: {}", channel_raw, e),
        })?;

    let base_url = get(BASE_URL_VAR)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let filters = get(FILTER_PATTERNS_VAR).map(|raw| FiltersConfig {
        patterns: raw
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
    });

    Ok(BridgeConfig {
        hermes: HermesConfig {
            base_url,
            api_key: get(API_KEY_VAR),
        },
        discord: DiscordConfig {
            token,
            channel_id,
            command_prefix: get(COMMAND_PREFIX_VAR)
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
        },
        filters,
    })
}
