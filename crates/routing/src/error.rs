//! Routing error types

use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RoutingError>;

/// Errors that can occur while parsing route specifications
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// Channel token is neither a valid index nor the wildcard
    #[error("invalid {side} channel '{token}': must be 0..4 or 'all'")]
    InvalidChannel {
        /// Which side of the route the token belongs to
        side: &'static str,
        /// The offending token
        token: String,
    },
}

impl RoutingError {
    /// Create an InvalidChannel error
    #[inline]
    pub fn invalid_channel(side: &'static str, token: impl Into<String>) -> Self {
        Self::InvalidChannel {
            side,
            token: token.into(),
        }
    }
}
