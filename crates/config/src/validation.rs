//! Configuration validation
//!
//! Checks cross-field constraints after parsing. Pure defaults always
//! validate, so a missing config file is never an error.

use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate a parsed configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.max_clients == 0 {
        return Err(ConfigError::invalid_value(
            "server",
            "max_clients",
            "must be at least 1",
        ));
    }

    if config.monitor.default_fps == 0 {
        return Err(ConfigError::invalid_value(
            "monitor",
            "default_fps",
            "must be at least 1",
        ));
    }

    if config.monitor.logs_dir.as_os_str().is_empty() {
        return Err(ConfigError::invalid_value(
            "monitor",
            "logs_dir",
            "must not be empty",
        ));
    }

    Ok(())
}
