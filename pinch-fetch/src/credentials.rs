//! File-backed credential source.
//!
//! Claude Code stores OAuth credentials in `~/.claude/.credentials.json`:
//!
//! ```json
//! {
//!   "claudeAiOauth": {
//!     "accessToken": "...",
//!     "refreshToken": "...",
//!     "expiresAt": 1735000000000
//!   }
//! }
//! ```
//!
//! SECURITY MODEL:
//! - The token is read fresh from the file on every call, never cached.
//! - Nothing here writes credentials or refreshes them; that is owned by
//!   Claude Code itself.
//! - Tokens are never logged, printed, or embedded in health reasons.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use pinch_core::{AccessToken, TokenHealth, TokenSource, TokenStatus};

/// Minutes before expiry at which a token is reported as `expiring`.
const EXPIRY_LEAD_MINUTES: i64 = 5;

// ============================================================================
// Credentials File Structures
// ============================================================================

/// Root structure of the `.credentials.json` file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    claude_ai_oauth: Option<OAuthCredentialsData>,
}

/// OAuth credentials block.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OAuthCredentialsData {
    #[serde(default)]
    access_token: Option<String>,
    /// Expiration timestamp, milliseconds since epoch.
    #[serde(default)]
    expires_at: Option<i64>,
}

impl OAuthCredentialsData {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(|ts| {
            // Timestamp might be in seconds or milliseconds
            let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
            Utc.timestamp_opt(secs, 0).single()
        })
    }
}

// ============================================================================
// Token Source
// ============================================================================

/// Reads the OAuth token from Claude Code's credentials file.
#[derive(Debug, Clone)]
pub struct FileTokenSource {
    path: Option<PathBuf>,
}

impl FileTokenSource {
    /// Creates a source pointing at the default credentials path.
    pub fn new() -> Self {
        Self {
            path: credentials_file_path(),
        }
    }

    /// Creates a source reading from a specific file (used by tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    fn read_credentials(&self) -> Option<OAuthCredentialsData> {
        let path = self.path.as_ref()?;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Credentials file not readable");
                return None;
            }
        };
        match serde_json::from_str::<CredentialsFile>(&content) {
            Ok(file) => file.claude_ai_oauth,
            Err(_) => {
                warn!(path = %path.display(), "Failed to parse credentials file");
                None
            }
        }
    }
}

impl Default for FileTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for FileTokenSource {
    fn read_token(&self) -> Option<AccessToken> {
        let creds = self.read_credentials()?;
        match creds.access_token {
            Some(token) if !token.is_empty() => Some(AccessToken::new(token)),
            _ => {
                warn!("No accessToken found in credentials file");
                None
            }
        }
    }

    fn check_health(&self) -> TokenHealth {
        let Some(creds) = self.read_credentials() else {
            return TokenHealth::missing("credentials file missing or unreadable");
        };

        if creds.access_token.as_deref().map_or(true, str::is_empty) {
            return TokenHealth::missing("no access token in credentials file");
        }

        let Some(expires_at) = creds.expiry() else {
            // Absence of an expiry never blocks polling
            return TokenHealth::ok("token present (no expiry recorded)");
        };

        let now = Utc::now();
        if expires_at <= now {
            let ago = now - expires_at;
            TokenHealth::new(
                TokenStatus::Expired,
                format!("token expired {}m ago", ago.num_minutes().max(0)),
            )
        } else if expires_at <= now + Duration::minutes(EXPIRY_LEAD_MINUTES) {
            let left = expires_at - now;
            TokenHealth::new(
                TokenStatus::Expiring,
                format!("token expires in {}m", left.num_minutes().max(0)),
            )
        } else {
            TokenHealth::ok(format!("token valid until {}", expires_at.to_rfc3339()))
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns the default path to Claude Code's credentials file.
pub fn credentials_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".claude").join(".credentials.json"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_credentials(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn millis(at: DateTime<Utc>) -> i64 {
        at.timestamp_millis()
    }

    #[test]
    fn test_read_token() {
        let file = write_credentials(
            r#"{"claudeAiOauth": {"accessToken": "test-token", "expiresAt": 1735000000000}}"#,
        );
        let source = FileTokenSource::with_path(file.path());
        let token = source.read_token().unwrap();
        assert_eq!(token.secret(), "test-token");
    }

    #[test]
    fn test_missing_file() {
        let source = FileTokenSource::with_path("/nonexistent/credentials.json");
        assert!(source.read_token().is_none());
        let health = source.check_health();
        assert_eq!(health.status, TokenStatus::Missing);
    }

    #[test]
    fn test_unparseable_file_is_missing() {
        let file = write_credentials("not json at all");
        let source = FileTokenSource::with_path(file.path());
        assert!(source.read_token().is_none());
        assert_eq!(source.check_health().status, TokenStatus::Missing);
    }

    #[test]
    fn test_empty_token_is_missing() {
        let file = write_credentials(r#"{"claudeAiOauth": {"accessToken": ""}}"#);
        let source = FileTokenSource::with_path(file.path());
        assert!(source.read_token().is_none());
        assert_eq!(source.check_health().status, TokenStatus::Missing);
    }

    #[test]
    fn test_no_expiry_degrades_to_ok() {
        let file = write_credentials(r#"{"claudeAiOauth": {"accessToken": "tok"}}"#);
        let source = FileTokenSource::with_path(file.path());
        let health = source.check_health();
        assert_eq!(health.status, TokenStatus::Ok);
        assert!(health.reason.contains("no expiry"));
    }

    #[test]
    fn test_future_expiry_is_ok() {
        let at = Utc::now() + Duration::hours(2);
        let file = write_credentials(&format!(
            r#"{{"claudeAiOauth": {{"accessToken": "tok", "expiresAt": {}}}}}"#,
            millis(at)
        ));
        let source = FileTokenSource::with_path(file.path());
        assert_eq!(source.check_health().status, TokenStatus::Ok);
    }

    #[test]
    fn test_expiry_within_buffer_is_expiring() {
        let at = Utc::now() + Duration::minutes(3);
        let file = write_credentials(&format!(
            r#"{{"claudeAiOauth": {{"accessToken": "tok", "expiresAt": {}}}}}"#,
            millis(at)
        ));
        let source = FileTokenSource::with_path(file.path());
        assert_eq!(source.check_health().status, TokenStatus::Expiring);
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let at = Utc::now() - Duration::minutes(30);
        let file = write_credentials(&format!(
            r#"{{"claudeAiOauth": {{"accessToken": "tok", "expiresAt": {}}}}}"#,
            millis(at)
        ));
        let source = FileTokenSource::with_path(file.path());
        let health = source.check_health();
        assert_eq!(health.status, TokenStatus::Expired);
        assert!(health.reason.contains("expired"));
    }

    #[test]
    fn test_seconds_timestamp_accepted() {
        let at = (Utc::now() + Duration::hours(1)).timestamp();
        let file = write_credentials(&format!(
            r#"{{"claudeAiOauth": {{"accessToken": "tok", "expiresAt": {at}}}}}"#
        ));
        let source = FileTokenSource::with_path(file.path());
        assert_eq!(source.check_health().status, TokenStatus::Ok);
    }

    #[test]
    fn test_health_reason_never_contains_token() {
        let file = write_credentials(
            r#"{"claudeAiOauth": {"accessToken": "sk-ant-secret-token"}}"#,
        );
        let source = FileTokenSource::with_path(file.path());
        let health = source.check_health();
        assert!(!health.reason.contains("sk-ant"));
    }
}
