//! Startup routing-file settings

use std::path::PathBuf;

use serde::Deserialize;

/// Routing preconfiguration settings
///
/// The file is read once before the listener starts accepting. Only lines
/// beginning with the `route` keyword are significant.
///
/// # Example
///
/// ```toml
/// [routes]
/// file = "route.rt"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path to the routing definition file
    pub file: PathBuf,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("route.rt"),
        }
    }
}
