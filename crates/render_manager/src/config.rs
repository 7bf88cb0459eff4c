//! Configuration for Render Manager
//!
//! Read from `<home>/config.toml`, where `<home>` is `$RENDER_MANAGER_HOME`
//! or `~/.render_manager`. Every field has a default, so a missing file or a
//! partial file is fine.

use crate::farm::collector::STATUSES;
use crate::layers::tokens::TokenConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use render_manager_logging::{logs_dir, render_manager_home};

/// Overrides [`FarmConfig::command`].
pub const FARM_COMMAND_ENV: &str = "RENDER_MANAGER_FARM_COMMAND";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderManagerConfig {
    /// Naming allow-lists
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Extension of rendered frames
    #[serde(default = "default_payload_extension")]
    pub payload_extension: String,

    /// Lifetime of cached disk collections
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default)]
    pub farm: FarmConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmConfig {
    /// Path to `deadlinecommand`
    #[serde(default = "default_farm_command")]
    pub command: PathBuf,

    /// Job statuses polled per collection
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,

    /// Plugin used when none is given
    #[serde(default = "default_plugin")]
    pub plugin: String,

    /// Where snapshots are written; `<home>/snapshots` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
}

fn default_payload_extension() -> String {
    "exr".to_string()
}

fn default_cache_ttl() -> u64 {
    30
}

fn default_farm_command() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\Program Files\Thinkbox\Deadline10\bin\deadlinecommand.exe")
    } else {
        PathBuf::from("deadlinecommand")
    }
}

fn default_statuses() -> Vec<String> {
    STATUSES.iter().map(|s| s.to_string()).collect()
}

fn default_plugin() -> String {
    "Nuke".to_string()
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            command: default_farm_command(),
            statuses: default_statuses(),
            plugin: default_plugin(),
            snapshot_dir: None,
        }
    }
}

impl FarmConfig {
    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir
            .clone()
            .unwrap_or_else(|| render_manager_home().join("snapshots"))
    }
}

impl Default for RenderManagerConfig {
    fn default() -> Self {
        Self {
            tokens: TokenConfig::default(),
            payload_extension: default_payload_extension(),
            cache_ttl_secs: default_cache_ttl(),
            farm: FarmConfig::default(),
        }
    }
}

impl RenderManagerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configuration from the default location plus environment overrides.
    pub fn resolve() -> Result<Self, ConfigError> {
        let mut config = Self::load_or_default(&config_path())?;
        config.apply_env_overrides(std::env::var_os(FARM_COMMAND_ENV).map(PathBuf::from));
        Ok(config)
    }

    fn apply_env_overrides(&mut self, farm_command: Option<PathBuf>) {
        if let Some(command) = farm_command.filter(|c| !c.as_os_str().is_empty()) {
            self.farm.command = command;
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// `<home>/config.toml`
pub fn config_path() -> PathBuf {
    render_manager_home().join("config.toml")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}
