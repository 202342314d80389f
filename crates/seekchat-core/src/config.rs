//! Session configuration
//!
//! Loaded from `~/.config/seekchat/config.toml` (platform config dir) when present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::chain::DispatchMode;
use crate::error::ConfigError;

const DEFAULT_EDIT_ANIMATION_MS: u64 = 250;

/// Configuration for a chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mode used by `ChatSession::dispatch`
    pub dispatch_mode: DispatchMode,
    /// Edit-mode transition duration passed to observers
    pub edit_animation_ms: u64,
    /// Default tracing filter (RUST_LOG takes precedence)
    pub log_filter: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::Interrupt,
            edit_animation_ms: DEFAULT_EDIT_ANIMATION_MS,
            log_filter: "info".to_string(),
        }
    }
}

impl SessionConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seekchat").join("config.toml"))
    }

    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded session config from {:?}", path);
        Ok(config)
    }

    /// Load the default config file, falling back to defaults if missing or invalid
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn edit_animation(&self) -> Duration {
        Duration::from_millis(self.edit_animation_ms)
    }
}
