//! Recorder error types

use std::io;
use thiserror::Error;

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Errors that can occur while recording
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Could not create the logs directory or the artifact file
    #[error("failed to create recording '{path}': {source}")]
    Create {
        /// Path being created
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Could not append to the artifact
    #[error("failed to write recording '{path}': {source}")]
    Write {
        /// Artifact path
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },
}
