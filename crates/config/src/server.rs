//! Listener and registry settings

use serde::Deserialize;

/// Default TCP port the switchboard listens on
pub const DEFAULT_PORT: u16 = 12345;

/// Default client capacity
pub const DEFAULT_MAX_CLIENTS: usize = 20;

/// Server settings
///
/// # Example
///
/// ```toml
/// [server]
/// bind = "0.0.0.0"
/// port = 12345
/// max_clients = 20
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,

    /// Listen port
    pub port: u16,

    /// Maximum simultaneously connected clients
    pub max_clients: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
        }
    }
}

impl ServerConfig {
    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
