//! Opaque access-token wrapper.
//!
//! SECURITY MODEL:
//! - A token lives for the duration of a single fetch call. No long-lived
//!   struct (monitor, shared state, snapshot) holds one as a field.
//! - `Debug` output is redacted so tokens cannot leak through logging.
//! - The type deliberately does not implement `Serialize` or `Display`.

use std::fmt;

/// An OAuth access token read fresh from the credential source.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the raw secret for building the authorization header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}
