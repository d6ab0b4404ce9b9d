//! Regex content filter for relayed chat.
//!
//! One pattern set applies to chat in both directions. Presence notices
//! and the startup notice never pass through it.

use fancy_regex::Regex;
use tracing::warn;

use crate::config::FiltersConfig;

/// Blocks chat lines matching any configured pattern.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    patterns: Vec<Regex>,
}

impl MessageFilter {
    /// Compile the configured patterns.
    ///
    /// Patterns were already checked by `validate_config`; one that still
    /// fails to compile is logged and left out.
    pub fn from_config(filters: Option<&FiltersConfig>) -> Self {
        let patterns = filters
            .map(|f| f.patterns.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|pattern| {
                Regex::new(pattern)
                    .map_err(|e| warn!("Skipping filter pattern '{}': {}", pattern, e))
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// True if `text` matches a pattern and must not be relayed.
    pub fn blocks(&self, text: &str) -> bool {
        self.patterns.iter().any(|regex| {
            regex.is_match(text).unwrap_or_else(|e| {
                // Backtrack limit exceeded; let the line through.
                warn!("Filter pattern '{}' failed on input: {}", regex.as_str(), e);
                false
            })
        })
    }

    pub fn is_active(&self) -> bool {
        !self.patterns.is_empty()
    }
}
