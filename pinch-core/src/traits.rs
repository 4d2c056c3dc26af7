//! Trait definitions for Pinch.
//!
//! These two traits are the seams between the monitor and the outside
//! world: credentials on one side, the network on the other. The monitor
//! is written entirely against them, so tests can substitute scripted
//! implementations.

use crate::error::UsageError;
use crate::models::{AccessToken, TokenHealth, UsageSnapshot};

/// A source of short-lived credentials, refreshed by an external system.
///
/// Implementors read the token fresh on every call; this core never caches
/// or writes credentials. The implementation detail (file, IPC, secret
/// manager) is irrelevant to the monitor.
pub trait TokenSource: Send + Sync {
    /// Reads the current access token, or `None` if unavailable.
    fn read_token(&self) -> Option<AccessToken>;

    /// Classifies the health of the credential source.
    ///
    /// `missing` means polling should be skipped entirely. `expired` and
    /// `expiring` are advisory; the token may still be briefly valid or may
    /// be refreshed out-of-band before the next read.
    fn check_health(&self) -> TokenHealth;
}

/// Fetches one usage snapshot with one token.
///
/// Implementors own the wire protocol, TLS policy, and response parsing.
/// The token reference must not be retained beyond the call.
pub trait UsageFetcher: Send + Sync {
    /// Performs a single authenticated read-only request.
    ///
    /// # Errors
    ///
    /// Returns a sanitized [`UsageError`] describing the failure; never
    /// leaks internal transport details.
    fn fetch(&self, token: &AccessToken) -> Result<UsageSnapshot, UsageError>;
}
