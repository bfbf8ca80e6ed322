//! CLI configuration
//!
//! Backend coordinates come from the config file under the platform config
//! directory, overridable with `CHRONOTRACK_BASE_URL` / `CHRONOTRACK_API_KEY`
//! environment variables.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub base_url: String,
    pub api_key: String,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .expect("Could not find config directory")
        .join("chronotrack")
}

fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

impl CliConfig {
    /// File values first, environment wins
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file().unwrap_or_default();

        if let Ok(base_url) = std::env::var("CHRONOTRACK_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(api_key) = std::env::var("CHRONOTRACK_API_KEY") {
            config.api_key = api_key;
        }

        if config.base_url.is_empty() || config.api_key.is_empty() {
            anyhow::bail!(
                "Backend not configured; run `chronotrack configure` or set \
                 CHRONOTRACK_BASE_URL and CHRONOTRACK_API_KEY"
            );
        }
        Ok(config)
    }

    fn from_file() -> Option<Self> {
        let raw = fs::read_to_string(config_path()).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = config_path();
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
        }
    }
}
