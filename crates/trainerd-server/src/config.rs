//! Server configuration.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Capacity of the console queue shared by transport events and operator requests.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
    /// Per-device queue for reliable frames; a device that falls this far
    /// behind is disconnected.
    #[serde(default = "default_reliable_queue_depth")]
    pub reliable_queue_depth: usize,
    /// Per-device queue for unreliable frames; frames beyond it are dropped.
    #[serde(default = "default_unreliable_queue_depth")]
    pub unreliable_queue_depth: usize,
    #[serde(default = "default_presentation_channel_capacity")]
    pub presentation_channel_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4296
}

fn default_event_queue_capacity() -> usize {
    1024
}

fn default_reliable_queue_depth() -> usize {
    1024
}

fn default_unreliable_queue_depth() -> usize {
    32
}

fn default_presentation_channel_capacity() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            event_queue_capacity: default_event_queue_capacity(),
            reliable_queue_depth: default_reliable_queue_depth(),
            unreliable_queue_depth: default_unreliable_queue_depth(),
            presentation_channel_capacity: default_presentation_channel_capacity(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from config/default.toml, then the user config directory,
    /// or fall back to defaults.
    pub fn load() -> Result<Self> {
        let candidates = [
            Some(PathBuf::from("config/default.toml")),
            dirs::config_dir().map(|dir| dir.join("trainerd").join("config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trainerd.toml");
        std::fs::write(&path, "port = 9000\nunreliable_queue_depth = 4\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.unreliable_queue_depth, 4);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.event_queue_capacity, 1024);
        assert_eq!(config.reliable_queue_depth, 1024);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(Config::load_from(&path).is_err());
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }
}
