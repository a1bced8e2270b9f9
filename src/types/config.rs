use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::types::track::Playlist;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Player configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub audio_files: Vec<String>,
    /// Style name for the player panel, used to key its widgets.
    pub class_name: String,
    pub poll_interval_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            audio_files: vec![
                "./audio/background.mp3".to_string(),
                "./audio/ambient.mp3".to_string(),
                "./audio/mystery.mp3".to_string(),
            ],
            class_name: String::new(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl AudioConfig {
    /// Save the config to a JSON file at the given path.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Load a config from a JSON file at the given path.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<AudioConfig, ConfigError> {
        let mut file = File::open(path)?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let config: AudioConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    pub fn playlist(&self) -> Playlist {
        Playlist::new(self.audio_files.clone())
    }

    /// Zero is bumped to one millisecond so the poll timer always advances.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
