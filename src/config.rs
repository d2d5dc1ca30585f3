use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::attributes::Overrides;
use crate::i18n::Catalog;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    /// Site-wide attribute defaults, applied before request attributes
    pub attributes: Overrides,
    /// Message catalog overrides, keyed by message key
    pub messages: BTreeMap<String, String>,
    pub state: StateConfig,
}

/// Remote review catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Reviews for `slug` are fetched from `{base_url}/{slug}`.
    ///
    /// Unset by default; there is no public endpoint in this format, so the
    /// HTTP source refuses to start until one is configured.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 10,
            user_agent: format!("plugin-reviews/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Location of the persisted option flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".plugin-reviews/options.json"),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(path = %path.display(), "Loaded configuration");

        Ok(config)
    }

    /// Load configuration from the default location (.plugin-reviews/config.yml)
    pub fn load_default() -> Result<Self> {
        Self::load(".plugin-reviews/config.yml")
    }

    /// Message catalog with this config's overrides applied
    pub fn catalog(&self) -> Catalog {
        Catalog::with_overrides(&self.messages)
    }
}
