//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate, later sources win:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. User file `<config_dir>/product-ingest/config.{toml,json,...}` (optional)
//! 3. `./product_ingest.{toml,json,...}` in the working directory (optional)
//! 4. `PRODUCT_INGEST_*` environment variables, `__` between sections,
//!    e.g. `PRODUCT_INGEST_API__MAX_CONCURRENT_REQUESTS=4`

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "PRODUCT_INGEST";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    pub logging: LoggingConfig,
}

/// Remote catalogue API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, products are read from `{base_url}/products/{id}`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum requests in flight at once
    pub max_concurrent_requests: usize,

    /// User agent string
    pub user_agent: String,
}

/// Local SQLite storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite file, created if missing
    pub path: PathBuf,
}

/// Ingest behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Seed for the synthetic fields. `None` seeds from entropy.
    pub random_seed: Option<u64>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files, defaults to `logs/` next to the executable
    pub log_directory: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "sqlx": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_concurrent_requests: defaults::MAX_CONCURRENT_REQUESTS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::DATABASE_FILE),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_directory: None,
            module_filters: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from all standard sources
    pub fn load() -> Result<Self, ConfigError> {
        let mut files = Vec::new();
        if let Some(user_file) = Self::user_config_file() {
            files.push(user_file);
        }
        files.push(PathBuf::from(defaults::LOCAL_CONFIG_NAME));
        Self::load_from(&files)
    }

    /// Load defaults, then each optional file in order, then the environment
    pub fn load_from(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        for file in files {
            builder = builder.add_source(config::File::from(file.as_path()).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single explicit file on top of the defaults, no environment
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from(path))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/product-ingest/config`, extension resolved by `config`
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME).join("config"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.max_concurrent_requests == 0 {
            return Err(ConfigError::Validation {
                message: "api.max_concurrent_requests must be greater than 0".to_string(),
            });
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "api.timeout_seconds must be greater than 0".to_string(),
            });
        }

        match Url::parse(&self.api.base_url) {
            Ok(url) if url.cannot_be_a_base() => {
                return Err(ConfigError::Validation {
                    message: format!("api.base_url '{}' cannot hold a path", self.api.base_url),
                });
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ConfigError::Validation {
                    message: format!(
                        "api.base_url '{}' is not a valid URL: {}",
                        self.api.base_url, e
                    ),
                });
            }
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: "database.path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Default values
pub mod defaults {
    pub const APP_DIR_NAME: &str = "product-ingest";

    /// Optional per-directory config file, extension resolved by `config`
    pub const LOCAL_CONFIG_NAME: &str = "product_ingest";

    pub const API_BASE_URL: &str = "https://fakestoreapi.com";

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const MAX_CONCURRENT_REQUESTS: usize = 10;

    pub const USER_AGENT: &str = "product-ingest/0.1";

    pub const DATABASE_FILE: &str = "products.db";

    pub const LOG_LEVEL: &str = "info";
}
