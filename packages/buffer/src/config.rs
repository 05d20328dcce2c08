//! Buffer configuration

use serde::{Deserialize, Serialize};

/// What `begin_edit` does when a session is already open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReentrantPolicy {
    /// Refuse with `EditError::SessionActive`, leaving the open session intact
    #[default]
    Reject,

    /// Drop the open session's edits and start over
    Abandon,

    /// Commit the open session, then start the new one
    AutoCommit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferConfig {
    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default)]
    pub max_levels: usize,

    #[serde(default)]
    pub reentrant: ReentrantPolicy,
}

impl BufferConfig {
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_reentrant(mut self, reentrant: ReentrantPolicy) -> Self {
        self.reentrant = reentrant;
        self
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            max_levels: 0,
            reentrant: ReentrantPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config: BufferConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BufferConfig::default());
    }

    #[test]
    fn test_camel_case_keys() {
        let config: BufferConfig =
            serde_json::from_str(r#"{ "maxLevels": 50, "reentrant": "autoCommit" }"#).unwrap();

        assert_eq!(config.max_levels, 50);
        assert_eq!(config.reentrant, ReentrantPolicy::AutoCommit);
    }
}
