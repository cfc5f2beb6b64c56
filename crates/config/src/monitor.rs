//! Monitor view and recording settings

use std::path::PathBuf;

use serde::Deserialize;

/// Default refresh rate for the monitor view
pub const DEFAULT_MONITOR_FPS: u32 = 2;

/// Monitor settings
///
/// # Example
///
/// ```toml
/// [monitor]
/// default_fps = 2
/// logs_dir = "logs"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Refresh rate used when `monitor` is entered without an argument
    pub default_fps: u32,

    /// Directory recording artifacts are written to
    pub logs_dir: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            default_fps: DEFAULT_MONITOR_FPS,
            logs_dir: PathBuf::from("logs"),
        }
    }
}
