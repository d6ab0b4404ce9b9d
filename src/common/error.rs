//! Error types for the application.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hermes API error: {0}")]
    Api(#[from] ApiError),

    #[error("Discord error: {0}")]
    Discord(#[from] DiscordError),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    MissingVar { name: String },

    #[error("Invalid value for '{name}': {message}")]
    InvalidValue { name: String, message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors talking to the Hermes server API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid response body from {url}: {message}")]
    InvalidBody { url: String, message: String },

    #[error("Could not build request for {url}: {message}")]
    InvalidRequest { url: String, message: String },

    #[error("Event stream {url} failed: {message}")]
    Stream { url: String, message: String },

    #[error("Event stream {url} ended")]
    StreamEnded { url: String },
}

impl ApiError {
    /// The HTTP status code, if the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Discord-related errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Result type alias for Hermes API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for Discord operations.
pub type DiscordResult<T> = std::result::Result<T, DiscordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = ApiError::Status {
            url: "http://localhost:8080/players/count".to_string(),
            status: 503,
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            err.to_string(),
            "http://localhost:8080/players/count responded with HTTP 503"
        );

        let err = ApiError::StreamEnded {
            url: "http://localhost:8080/chat/stream".to_string(),
        };
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_config_error_wraps_into_app_error() {
        let err: AppError = ConfigError::MissingVar {
            name: "DISCORD_BOT_TOKEN".to_string(),
        }
        .into();
        assert!(err.to_string().contains("DISCORD_BOT_TOKEN"));
    }
}
