//! Configuration management for prodcat.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logging::LogFormat;
use crate::storage::JsonFileStore;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "prodcat";

/// Default products file name.
const PRODUCTS_FILE_NAME: &str = "products.json";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "PRODCAT_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PRODCAT_`, sections split by `__`)
/// 2. TOML config file at `~/.config/prodcat/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the products JSON file.
    /// Defaults to `~/.local/share/prodcat/products.json`
    pub products_path: Option<PathBuf>,
    /// Start with an empty catalog when the products file does not exist.
    /// When false, a missing file is an error.
    pub create_if_missing: bool,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_address: String,
    /// Port to listen on.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format for log lines.
    pub format: LogFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            products_path: None, // Will be resolved to default at runtime
            create_if_missing: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A config file that does not exist is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate one configuration file.
    ///
    /// Unlike [`Config::load_from`], a file that does not exist is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the file does not exist, or the
    /// error from loading or validating it.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigValidation {
                message: format!("configuration file not found: {}", path.display()),
            });
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.products_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "products_path cannot be empty".to_string(),
                });
            }
        }

        if self.server.bind_address.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "bind_address cannot be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "port must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the products file path, resolving defaults if not set.
    #[must_use]
    pub fn products_path(&self) -> PathBuf {
        self.storage
            .products_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(PRODUCTS_FILE_NAME))
    }

    /// Get the `host:port` address the server listens on.
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Build the JSON file store described by this configuration.
    #[must_use]
    pub fn product_store(&self) -> JsonFileStore {
        JsonFileStore::new(self.products_path()).create_if_missing(self.storage.create_if_missing)
    }
}
