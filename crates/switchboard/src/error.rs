//! Switchboard error types

use patchbay_protocol::ClientId;
use thiserror::Error;

/// Result type for switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Errors that can occur while mutating switchboard state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SwitchboardError {
    /// Every client slot is occupied
    #[error("server full: all {capacity} client slots are in use")]
    CapacityExceeded {
        /// Configured slot capacity
        capacity: usize,
    },

    /// Id does not resolve to a live client
    #[error("no such client {}", .id.as_u32())]
    UnknownClient {
        /// The id that failed to resolve
        id: ClientId,
    },
}

impl SwitchboardError {
    /// Create a CapacityExceeded error
    #[inline]
    pub fn capacity_exceeded(capacity: usize) -> Self {
        Self::CapacityExceeded { capacity }
    }

    /// Create an UnknownClient error
    #[inline]
    pub fn unknown_client(id: ClientId) -> Self {
        Self::UnknownClient { id }
    }
}
