//! Configuration for storage and the advisory service.
//!
//! [`PartlifeConfig::load`] reads `config/config.toml` when present and then
//! environment variables prefixed `PARTLIFE` with `__` as the section
//! separator, e.g. `PARTLIFE_STORAGE__BACKEND=redis` or
//! `PARTLIFE_ADVISORY__API_KEY=...`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
const ENV_PREFIX: &str = "PARTLIFE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Redis,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            redis_url: default_redis_url(),
            key: default_storage_key(),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct AdvisoryConfig {
    /// Without a key every advice request falls back to the apology text.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for AdvisoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartlifeConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    /// Use the demo inventory when storage holds nothing readable.
    #[serde(default = "default_seed_on_empty")]
    pub seed_on_empty: bool,
}

impl Default for PartlifeConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            advisory: AdvisoryConfig::default(),
            seed_on_empty: default_seed_on_empty(),
        }
    }
}

fn default_storage_path() -> String {
    "partlife_data.json".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_storage_key() -> String {
    "partlife_manager_data".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_seed_on_empty() -> bool {
    true
}

impl PartlifeConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither source yields a valid configuration.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from the TOML file at `path` (optional), then env vars.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if neither source yields a valid configuration.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env_source());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // A present but unreadable file is worth a warning; env alone may still do.
                if path.exists() {
                    log::warn!(
                        "Failed to load config file {}, falling back to env. Error: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(env_source())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        settings.try_deserialize::<PartlifeConfig>().map_err(|e| {
            ConfigError::Message(format!(
                "Configuration could not be loaded from file or environment: {}",
                e
            ))
        })
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
