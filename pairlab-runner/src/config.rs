//! Application configuration loaded from TOML.
//!
//! Every field has a default, so a missing file or a partial file both work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pairlab_core::data::TickerCatalog;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which price provider to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Synthetic,
}

/// `[provider]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: ProviderKind,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Retries on connect/timeout failures. HTTP errors are never retried.
    pub max_retries: u32,
    /// Seed for the synthetic random walk.
    pub synthetic_seed: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: ProviderKind::Yahoo,
            timeout_secs: 30,
            max_retries: 2,
            synthetic_seed: 42,
        }
    }
}

/// A century of history is more than any price source serves.
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Top-level configuration shared by the CLI and the TUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Accept tickers outside the catalog.
    pub allow_custom_tickers: bool,
    /// Range length used when no start date is given.
    pub default_lookback_days: u32,
    /// Default tracing filter; `RUST_LOG` wins when set.
    pub log_level: String,
    pub catalog: TickerCatalog,
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_custom_tickers: false,
            default_lookback_days: 365,
            log_level: "info".to_string(),
            catalog: TickerCatalog::popular(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/pairlab/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("pairlab").join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), otherwise the default path
    /// if it exists, otherwise built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.is_empty() {
            return Err(ConfigError::Invalid("catalog must list at least one ticker".into()));
        }
        if self.default_lookback_days == 0 || self.default_lookback_days > MAX_LOOKBACK_DAYS {
            return Err(ConfigError::Invalid(format!(
                "default_lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}"
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be positive".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".into()));
        }
        Ok(())
    }
}
