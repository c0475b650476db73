//! Application configuration management.
//!
//! Persistent settings live in `config.json` under the platform config
//! directory (XDG on Linux, AppData on Windows). Everything in here can
//! be overridden per-invocation by CLI flags or environment variables;
//! the file just saves retyping the store coordinates at every shift
//! start.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::ThemeArg;
use crate::store::http::DEFAULT_TIMEOUT_SECS;

/// Default allow-list node name.
pub const DEFAULT_NODE: &str = "valid_codes";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the allow-list store.
    #[serde(default)]
    pub store_url: Option<String>,

    /// Node under the store base URL that holds the allow-list.
    #[serde(default = "default_node")]
    pub node: String,

    /// Request timeout for store operations, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Preferred TUI theme.
    #[serde(default)]
    pub theme: ThemeArg,
}

fn default_node() -> String {
    DEFAULT_NODE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            node: default_node(),
            timeout_secs: default_timeout_secs(),
            theme: ThemeArg::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// A missing or unreadable file yields the defaults; a corrupt file is
    /// logged and also falls back to defaults rather than aborting.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::debug!("no config directory available: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration from an explicit path.
    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path).map_err(anyhow::Error::from).and_then(|content| {
            serde_json::from_str(&content).map_err(anyhow::Error::from)
        }) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save the configuration to the default platform-specific path.
    ///
    /// # Errors
    ///
    /// Returns an error when the config directory cannot be determined or
    /// the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save the configuration to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "scangate", "scangate")
            .ok_or_else(|| anyhow::anyhow!("failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}
