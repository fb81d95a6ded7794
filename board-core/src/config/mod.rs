//! Configuration management for the board service
//!
//! Settings come from built-in defaults, a TOML file, or `BOARD_*`
//! environment variables, and are validated before use.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Record store configuration
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Request header carrying the authenticated actor id
    pub actor_header: String,

    /// How long in-flight requests get to finish after a shutdown signal
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the durable record log
    pub data_dir: PathBuf,

    /// Write accepted records to the durable log
    pub persist: bool,

    /// Buffered notifications per subscriber before lagging ones drop events
    pub event_capacity: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            actor_header: "x-actor-id".to_string(),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), persist: true, event_capacity: 1024 }
    }
}

impl StoreConfig {
    /// Volatile store: nothing touches the filesystem
    pub fn in_memory() -> Self {
        Self { persist: false, ..Default::default() }
    }

    /// Durable store rooted at `data_dir`
    pub fn persistent(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), persist: true, ..Default::default() }
    }

    /// Location of the record log inside `data_dir`
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("records.log")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json_format: false, with_target: true }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: BOARD_<SECTION>_<KEY>
    /// Example: BOARD_SERVER_BIND_ADDRESS=0.0.0.0:8080
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let mut config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server config
        if let Ok(addr) = env::var("BOARD_SERVER_BIND_ADDRESS") {
            self.server.bind_address = addr
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid bind address: {}", e)))?;
        }
        if let Ok(header) = env::var("BOARD_SERVER_ACTOR_HEADER") {
            self.server.actor_header = header;
        }
        if let Ok(timeout) = env::var("BOARD_SERVER_SHUTDOWN_TIMEOUT") {
            self.server.shutdown_timeout = humantime::parse_duration(&timeout)
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid shutdown timeout: {}", e)))?;
        }

        // Store config
        if let Ok(data_dir) = env::var("BOARD_STORE_DATA_DIR") {
            self.store.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(persist) = env::var("BOARD_STORE_PERSIST") {
            self.store.persist = persist
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid persist flag: {}", e)))?;
        }
        if let Ok(capacity) = env::var("BOARD_STORE_EVENT_CAPACITY") {
            self.store.event_capacity = capacity
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid event capacity: {}", e)))?;
        }

        // Logging config
        if let Ok(level) = env::var("BOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = env::var("BOARD_LOG_JSON") {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.actor_header.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "actor_header must not be empty".to_string(),
            ));
        }
        if axum::http::HeaderName::from_bytes(self.server.actor_header.as_bytes()).is_err() {
            return Err(ConfigError::ValidationFailed(format!(
                "actor_header is not a valid header name: {}",
                self.server.actor_header
            )));
        }

        if self.store.event_capacity == 0 {
            return Err(ConfigError::ValidationFailed(
                "event_capacity must be greater than 0".to_string(),
            ));
        }

        if LogLevel::parse(&self.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}
