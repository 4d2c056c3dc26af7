//! The usage error taxonomy.
//!
//! Every failure a poll cycle can hit is collapsed into one of these
//! variants. The `Display` strings are the sanitized, user-facing messages:
//! no raw response bodies, no network internals, and never token material.
//! Errors cross the monitor boundary only as a field on a published
//! snapshot, never as a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sanitized error carried on a [`UsageSnapshot`](crate::UsageSnapshot).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum UsageError {
    /// No credential source is available at all.
    #[error("No OAuth token - is Claude Code installed?")]
    MissingCredential,

    /// The endpoint rejected the token (HTTP 401). Retryable once with a
    /// fresh token read, since the upstream CLI may refresh it out-of-band.
    #[error("HTTP 401")]
    Unauthorized,

    /// Still unauthorized after exhausting fresh-token retries. Distinct
    /// from [`UsageError::Unauthorized`] so the UI can prompt for a manual
    /// reconnect instead of showing a generic failure.
    #[error("Token expired - open Claude Code to refresh, then click Reconnect")]
    ReconnectRequired,

    /// Generic network failure (DNS, connect, timeout).
    #[error("Connection failed")]
    NetworkFailure,

    /// Certificate or TLS negotiation failure.
    #[error("SSL certificate error")]
    TransportSecurityFailure,

    /// Non-2xx HTTP status other than 401. Only the numeric status is
    /// surfaced.
    #[error("HTTP {0}")]
    UpstreamStatus(u16),
}

impl UsageError {
    /// Returns true if this error should trigger the fresh-token retry
    /// policy rather than the normal polling cadence.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UsageError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_sanitized() {
        assert_eq!(UsageError::NetworkFailure.to_string(), "Connection failed");
        assert_eq!(
            UsageError::TransportSecurityFailure.to_string(),
            "SSL certificate error"
        );
        assert_eq!(UsageError::UpstreamStatus(503).to_string(), "HTTP 503");
        assert_eq!(UsageError::Unauthorized.to_string(), "HTTP 401");
    }

    #[test]
    fn test_missing_credential_mentions_oauth() {
        let msg = UsageError::MissingCredential.to_string();
        assert!(msg.contains("No OAuth token"));
    }

    #[test]
    fn test_only_401_is_retryable() {
        assert!(UsageError::Unauthorized.is_unauthorized());
        assert!(!UsageError::ReconnectRequired.is_unauthorized());
        assert!(!UsageError::NetworkFailure.is_unauthorized());
        assert!(!UsageError::UpstreamStatus(401).is_unauthorized());
    }

    #[test]
    fn test_serde_round_trip() {
        let err = UsageError::UpstreamStatus(500);
        let json = serde_json::to_string(&err).unwrap();
        let back: UsageError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
