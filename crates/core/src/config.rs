//! Application configuration.
//!
//! Values are layered: built-in defaults, then `config.toml` in the
//! platform config directory, then `GAMEDEX_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Default upstream catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_PREFIX: &str = "GAMEDEX";
const CONFIG_DIR: &str = "gamedex";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_CONFIG: &str = r#"# gamedex configuration
#
# Environment variables override these values:
#   GAMEDEX_BASE_URL, GAMEDEX_API_KEY, GAMEDEX_REQUEST_TIMEOUT_SECS

base_url = "https://api.rawg.io/api"
api_key = ""
request_timeout_secs = 30
"#;

/// Runtime settings for talking to the upstream catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the catalog API, without a trailing slash.
    pub base_url: String,
    /// API key appended to every request. Not validated locally.
    pub api_key: String,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path(), ENV_PREFIX)
    }

    /// Load configuration from an explicit file and environment prefix.
    pub fn load_from(path: impl AsRef<Path>, env_prefix: &str) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("api_key", defaults.api_key)?
            .set_default(
                "request_timeout_secs",
                defaults.request_timeout_secs as i64,
            )?
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix(env_prefix))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        config.base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Ok(config)
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}
