//! Patchbay Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use patchbay_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[server]\nport = 4000").unwrap();
//! assert_eq!(config.server.port, 4000);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 12345
//! max_clients = 20
//!
//! [routes]
//! file = "route.rt"
//!
//! [monitor]
//! default_fps = 2
//! logs_dir = "logs"
//!
//! [log]
//! level = "info"
//! ```

mod error;
mod logging;
mod monitor;
mod routes;
mod server;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogLevel};
pub use monitor::{MonitorConfig, DEFAULT_MONITOR_FPS};
pub use routes::RoutesConfig;
pub use server::{ServerConfig, DEFAULT_MAX_CLIENTS, DEFAULT_PORT};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listener and registry settings
    pub server: ServerConfig,

    /// Startup routing-file settings
    pub routes: RoutesConfig,

    /// Monitor view and recording settings
    pub monitor: MonitorConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
