//! Configuration management
//!
//! TOML configuration under the platform config directory, with serde
//! defaults so a missing or partial file still yields a usable setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Curation scheduling settings
    #[serde(default)]
    pub curation: CurationConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override the default data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Curation scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Hours between scheduled curation runs
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

fn default_interval_hours() -> u64 {
    24
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save configuration to the config file
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "feedback-curator", "feedback-curator")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "feedback-curator", "feedback-curator")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}
