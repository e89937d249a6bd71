//! Runtime configuration: an optional TOML file plus environment fallbacks.
//!
//! ```toml
//! database_url = "stock-data.sqlite"
//!
//! [dataset]
//! min_weeks = 240
//! exclude_st = true
//! ```
//!
//! Every key is optional. The database URL is resolved with [`Config::database_url`]
//! in the order: explicit override, config file, `DATABASE_URL`.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable consulted when no database URL is configured.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite path or `sqlite://` URL.
    pub database_url: Option<String>,
    /// Dataset export selection.
    #[serde(default)]
    pub dataset: DatasetCfg,
}

/// Selection rules for [`crate::dataset::build_dataset`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatasetCfg {
    /// Minimum number of weekly rows an instrument needs to be exported.
    pub min_weeks: usize,
    /// Drop instruments whose name contains "ST" (special treatment).
    pub exclude_st: bool,
}

impl Default for DatasetCfg {
    fn default() -> Self {
        Self {
            min_weeks: 240,
            exclude_st: true,
        }
    }
}

impl DatasetCfg {
    /// Check the selection rules; also applied to command-line overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_weeks == 0 {
            return Err(ConfigError::Invalid {
                field: "dataset.min_weeks",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Config {
    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Config = toml::from_str(s).context("failed to parse config toml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a config file.
    pub fn load_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.dataset.validate()?;
        if self
            .database_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            return Err(ConfigError::Invalid {
                field: "database_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve the database URL: `override_url`, then the file, then `DATABASE_URL`.
    pub fn database_url(&self, override_url: Option<&str>) -> Result<String, ConfigError> {
        if let Some(url) = override_url {
            return Ok(url.to_string());
        }
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }
        std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl(DATABASE_URL_ENV))
    }
}
