//! Configuration for the `dagjose` CLI
//!
//! Loaded from `~/.dagjose/config.toml` (or an explicit path). Every field
//! has a default, so a missing file or a partial file is fine.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use common::prelude::{HashFunction, InputEncoding, NATIVE_HASH_LENGTH};

pub const APP_NAME: &str = "dagjose";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration stored in config.toml
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hash function used to address new blocks
    #[serde_as(as = "DisplayFromStr")]
    pub hash: HashFunction,
    /// Digest length in bytes, -1 for the hash function's native length
    pub hash_len: i32,
    /// Encoding `put` assumes when none is given
    #[serde_as(as = "DisplayFromStr")]
    pub input_encoding: InputEncoding,
    /// Default log level
    #[serde_as(as = "DisplayFromStr")]
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash: HashFunction::Sha2_256,
            hash_len: NATIVE_HASH_LENGTH,
            input_encoding: InputEncoding::Json,
            log_level: tracing::Level::INFO,
        }
    }
}

impl Config {
    /// Get the config file path (custom or default ~/.dagjose/config.toml)
    pub fn path(custom_path: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)).join(CONFIG_FILE_NAME))
    }

    /// Load the config, falling back to defaults if the file does not exist
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = Self::path(custom_path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_toml = fs::read_to_string(&path)?;
        let config = toml::from_str(&config_toml)?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
