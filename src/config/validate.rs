//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use reqwest::Url;

use crate::common::error::ConfigError;
use crate::config::types::BridgeConfig;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &BridgeConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Validate Discord config
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("DISCORD_BOT_TOKEN has not been configured (still using placeholder)".to_string());
    }
    if config.discord.channel_id == 0 {
        errors.push("DISCORD_CHANNEL_ID must be non-zero".to_string());
    }

    // Validate Hermes config
    match Url::parse(&config.hermes.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "HERMES_API_BASE_URL must use http or https (got '{}')",
            url.scheme()
        )),
        Err(e) => errors.push(format!(
            "HERMES_API_BASE_URL '{}' is not a valid URL: {}",
            config.hermes.base_url, e
        )),
    }

    // Validate filter patterns (try to compile them)
    if let Some(ref filters) = config.filters {
        for (i, pattern) in filters.patterns.iter().enumerate() {
            if fancy_regex::Regex::new(pattern).is_err() {
                errors.push(format!(
                    "BRIDGE_FILTER_PATTERNS[{}] is not a valid regex: '{}'",
                    i, pattern
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}
