//! Token health classification.
//!
//! The monitor checks credential health before every poll. `missing` is the
//! only status that skips the network call entirely; `expired` and
//! `expiring` are soft warnings because the upstream CLI may refresh the
//! token out-of-band between the check and the read.

use serde::{Deserialize, Serialize};

/// Health status of the credential source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// Token present and not near expiry.
    Ok,
    /// Token expires within the lead buffer.
    Expiring,
    /// Token expiry timestamp is in the past.
    Expired,
    /// No credential file, or no token field in it.
    Missing,
}

/// A health status with a human-readable reason.
///
/// The reason never embeds token material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHealth {
    /// The classified status.
    pub status: TokenStatus,
    /// Human-readable explanation (e.g., "expires in 3m").
    pub reason: String,
}

impl TokenHealth {
    /// Creates a health value with the given status and reason.
    pub fn new(status: TokenStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Shorthand for a healthy token.
    pub fn ok(reason: impl Into<String>) -> Self {
        Self::new(TokenStatus::Ok, reason)
    }

    /// Shorthand for a missing credential.
    pub fn missing(reason: impl Into<String>) -> Self {
        Self::new(TokenStatus::Missing, reason)
    }

    /// Returns true if polling should be skipped entirely.
    pub fn is_missing(&self) -> bool {
        self.status == TokenStatus::Missing
    }
}
