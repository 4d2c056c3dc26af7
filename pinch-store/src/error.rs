//! Store error types.

use thiserror::Error;

/// Errors from settings persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No usable config directory on this platform.
    #[error("Could not determine config directory")]
    NoConfigDir,
}
