//! Configuration type definitions.

/// Default Hermes API location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default Discord command prefix (`!mcstatus`, `!mc players`, ...).
pub const DEFAULT_COMMAND_PREFIX: &str = "!mc";

/// Root configuration structure.
///
/// Read-only after startup; components receive the parts they need.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub hermes: HermesConfig,
    pub discord: DiscordConfig,
    pub filters: Option<FiltersConfig>,
}

/// Hermes server API configuration.
#[derive(Debug, Clone)]
pub struct HermesConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token. `None` means no `Authorization` header at all.
    pub api_key: Option<String>,
}

impl Default for HermesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// Discord bot configuration.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub token: String,
    /// The single channel the bridge relays to and from.
    pub channel_id: u64,
    pub command_prefix: String,
}

/// Message filtering configuration.
#[derive(Debug, Clone, Default)]
pub struct FiltersConfig {
    /// Regex patterns; matching messages are not relayed in either direction.
    pub patterns: Vec<String>,
}
