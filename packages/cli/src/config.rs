use revise_buffer::BufferConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "revise.config.json";

/// Revise configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// History settings passed to the edit buffer
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Default replay output format (text, json)
    #[serde(default = "default_format")]
    pub format: String,

    /// Reject writes to paths missing from the script's initial model
    #[serde(default)]
    pub strict: bool,
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer: BufferConfig::default(),
            format: default_format(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revise_buffer::ReentrantPolicy;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "buffer": { "maxLevels": 25, "reentrant": "abandon" },
            "format": "json",
            "strict": true
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.buffer.max_levels, 25);
        assert_eq!(config.buffer.reentrant, ReentrantPolicy::Abandon);
        assert_eq!(config.format, "json");
        assert!(config.strict);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.buffer.max_levels, 0);
        assert_eq!(config.buffer.reentrant, ReentrantPolicy::Reject);
        assert_eq!(config.format, "text");
        assert!(!config.strict);
    }

    #[test]
    fn test_load_missing_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "buffer": { "maxLevels": 3 } }"#,
        )
        .unwrap();

        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.buffer.max_levels, 3);
        assert_eq!(config.format, "text");
    }
}
