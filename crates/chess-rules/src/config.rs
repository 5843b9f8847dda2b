//! Game configuration loaded from TOML.

use std::path::Path;

use chess_core::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A repetition threshold below two can never mean a repeat.
    #[error("repetition threshold must be at least 2, got {0}")]
    InvalidThreshold(usize),
}

/// Settings for a [`Game`](crate::Game).
///
/// ```toml
/// first_side = "black"
/// repetition_threshold = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    /// Side that makes the first move. Defaults to White.
    #[serde(default = "default_first_side")]
    pub first_side: Side,
    /// Occurrences of one position that count as a repetition. Defaults to 3.
    #[serde(default = "default_repetition_threshold")]
    pub repetition_threshold: usize,
}

fn default_first_side() -> Side {
    Side::White
}

fn default_repetition_threshold() -> usize {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            first_side: default_first_side(),
            repetition_threshold: default_repetition_threshold(),
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidThreshold`] for a threshold below 2.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the settings that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetition_threshold < 2 {
            return Err(ConfigError::InvalidThreshold(self.repetition_threshold));
        }
        Ok(())
    }
}
