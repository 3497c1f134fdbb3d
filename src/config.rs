//! Application configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file named by
//! [`CONFIG_FILE_VAR`], then individual environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_FILE_VAR: &str = "TASKDESK_CONFIG";
/// Environment variable overriding the listen address.
pub const BIND_VAR: &str = "TASKDESK_BIND";
/// Environment variable selecting the PostgreSQL store.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_VAR: &str = "TASKDESK_POOL_SIZE";
/// Environment variable overriding the log filter directive.
pub const LOG_VAR: &str = "TASKDESK_LOG";

const DEFAULT_POOL_SIZE: u32 = 5;
const DEFAULT_LOG: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    ReadFile {
        /// Path named by the environment.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON for [`AppConfig`].
    #[error("failed to parse configuration file {path}: {source}")]
    ParseFile {
        /// Path named by the environment.
        path: PathBuf,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
    /// A value is not a valid listen address.
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
    /// A value is not a positive pool size.
    #[error("invalid pool size '{0}'")]
    InvalidPoolSize(String),
}

/// Runtime settings for the web server and its store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on.
    pub bind: SocketAddr,
    /// PostgreSQL connection URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
    /// `tracing` filter directive.
    pub log: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            log: DEFAULT_LOG.to_owned(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when
    /// an override holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration using `lookup` to resolve environment variables.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or when
    /// an override holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = match read(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Some(bind) = read(BIND_VAR) {
            config.bind = parse_bind(&bind)?;
        }
        if let Some(url) = read(DATABASE_URL_VAR) {
            config.database_url = Some(url);
        }
        if let Some(size) = read(POOL_SIZE_VAR) {
            config.pool_size = parse_pool_size(&size)?;
        }
        if let Some(log) = read(LOG_VAR) {
            config.log = log;
        }
        Ok(config)
    }

    /// Reads a JSON configuration file; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] or [`ConfigError::ParseFile`].
    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(ConfigError::ReadFile { path, source }),
        };
        let config: Self = match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(source) => return Err(ConfigError::ParseFile { path, source }),
        };
        if config.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(config.pool_size.to_string()));
        }
        Ok(config)
    }
}

fn parse_bind(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBind(raw.to_owned()))
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| ConfigError::InvalidPoolSize(raw.to_owned()))
}
