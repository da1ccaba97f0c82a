//! Layered configuration for the `catalog` binary.
//!
//! Later sources win: defaults, then `config/catalog.toml` (or `--config`),
//! then `CATALOG_*` variables, with `.env` loaded into the environment first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use catalog_core::{UpdateMethod, ValidationPolicy};
use serde::Deserialize;

const ENV_PREFIX: &str = "CATALOG";
const DEFAULT_CONFIG_FILE: &str = "config/catalog.toml";

/// Top-level configuration loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub validation: ValidationPolicy,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, the TOML file and `CATALOG_*`
    /// environment variables. An explicit `file` must exist; the default one
    /// may be missing.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();
        Self::from_sources(file, ENV_PREFIX)
    }

    fn from_sources(file: Option<&Path>, env_prefix: &str) -> anyhow::Result<Self> {
        let (path, required) = match file {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let cfg = config::Config::builder()
            .add_source(config::File::from(path.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to build configuration from {}", path.display()))?;

        cfg.try_deserialize()
            .with_context(|| "failed to deserialize configuration")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "ApiSettings::default_base_url")]
    pub base_url: String,
    #[serde(default = "ApiSettings::default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub update_method: UpdateMethod,
}

impl ApiSettings {
    fn default_base_url() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_timeout_ms() -> u64 {
        10_000
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_ms: Self::default_timeout_ms(),
            update_method: UpdateMethod::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "LogSettings::default_filter")]
    pub filter: String,
}

impl LogSettings {
    fn default_filter() -> String {
        "warn".to_string()
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}
