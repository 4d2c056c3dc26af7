//! Blocking HTTP client for the OAuth usage endpoint.
//!
//! # API Endpoint
//!
//! ```text
//! GET https://api.anthropic.com/api/oauth/usage
//! Authorization: Bearer <access_token>
//! anthropic-beta: oauth-2025-04-20
//! ```
//!
//! # Response Format
//!
//! ```json
//! {
//!   "five_hour": {"utilization": 25.0, "resets_at": "2025-01-01T12:00:00Z"},
//!   "seven_day": {"utilization": 45.0, "resets_at": "2025-01-05T00:00:00Z"},
//!   "seven_day_sonnet": {"utilization": 30.0, "resets_at": "2025-01-05T00:00:00Z"},
//!   "extra_usage": {"is_enabled": true, "monthly_limit": 10000, "used_credits": 1139, "utilization": 11.4}
//! }
//! ```
//!
//! Monetary fields arrive in minor units (cents) and stay in minor units on
//! the parsed snapshot. Missing fields default to zero/absent rather than
//! failing the whole parse.

use std::error::Error as StdError;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use pinch_core::{AccessToken, ExtraUsage, UsageBucket, UsageError, UsageFetcher, UsageSnapshot};

// ============================================================================
// Constants
// ============================================================================

/// The OAuth usage endpoint (read-only, non-billable).
pub const USAGE_API_URL: &str = "https://api.anthropic.com/api/oauth/usage";

/// Value of the `anthropic-beta` feature-flag header.
pub const OAUTH_BETA_HEADER: &str = "oauth-2025-04-20";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Wire Structures
// ============================================================================

/// Raw response from the usage API.
#[derive(Debug, Default, Deserialize)]
struct UsageApiResponse {
    #[serde(default)]
    five_hour: Option<WireBucket>,
    #[serde(default)]
    seven_day: Option<WireBucket>,
    #[serde(default)]
    seven_day_sonnet: Option<WireBucket>,
    #[serde(default)]
    extra_usage: Option<WireExtraUsage>,
}

/// One usage window as it appears on the wire.
#[derive(Debug, Default, Deserialize)]
struct WireBucket {
    #[serde(default)]
    utilization: f64,
    #[serde(default)]
    resets_at: Option<String>,
}

/// Extra-usage block as it appears on the wire. Limit and credits are in
/// minor units (cents).
#[derive(Debug, Default, Deserialize)]
struct WireExtraUsage {
    #[serde(default)]
    is_enabled: bool,
    #[serde(default)]
    monthly_limit: f64,
    #[serde(default)]
    used_credits: f64,
    #[serde(default)]
    utilization: f64,
}

impl WireBucket {
    fn into_bucket(self) -> UsageBucket {
        let resets_at = self.resets_at.as_deref().and_then(parse_timestamp);
        let mut bucket = UsageBucket {
            utilization: self.utilization,
            resets_at,
        };
        bucket.sanitize();
        bucket
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl UsageApiResponse {
    fn into_snapshot(self) -> UsageSnapshot {
        let extra = self.extra_usage.unwrap_or_default();
        UsageSnapshot {
            five_hour: self.five_hour.unwrap_or_default().into_bucket(),
            seven_day: self.seven_day.unwrap_or_default().into_bucket(),
            seven_day_sonnet: self.seven_day_sonnet.unwrap_or_default().into_bucket(),
            extra_usage: ExtraUsage {
                enabled: extra.is_enabled,
                monthly_limit_minor: extra.monthly_limit.round() as i64,
                used_credits_minor: extra.used_credits.round() as i64,
                // Server value surfaced as-is, never recomputed from cents
                utilization: extra.utilization,
            },
            error: None,
            last_updated: Some(Utc::now()),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Blocking client for the usage endpoint.
///
/// Enforces TLS 1.2 or newer and a 10-second request timeout. Stateless
/// apart from the connection pool; the token is taken per call and never
/// stored.
#[derive(Debug, Clone)]
pub struct UsageClient {
    http: Client,
    url: String,
}

impl UsageClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_url(USAGE_API_URL)
    }

    /// Creates a client against a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error if the TLS backend cannot be
    /// initialized.
    pub fn with_url(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Performs one authenticated GET and parses the response.
    ///
    /// # Errors
    ///
    /// Maps transport outcomes to the sanitized taxonomy: certificate
    /// failures collapse to [`UsageError::TransportSecurityFailure`], other
    /// network failures to [`UsageError::NetworkFailure`], 401 to
    /// [`UsageError::Unauthorized`], and any other non-2xx status to
    /// [`UsageError::UpstreamStatus`].
    pub fn fetch_usage(&self, token: &AccessToken) -> Result<UsageSnapshot, UsageError> {
        debug!(url = %self.url, "Fetching usage");

        let response = self
            .http
            .get(&self.url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.secret()),
            )
            .header("anthropic-beta", OAUTH_BETA_HEADER)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Usage API rejected the token (401)");
            return Err(UsageError::Unauthorized);
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "Usage API returned an error status");
            return Err(UsageError::UpstreamStatus(status.as_u16()));
        }

        let body = response.text().map_err(|e| map_transport_error(&e))?;
        debug!(len = body.len(), "Received usage response");

        parse_response(&body)
    }
}

impl UsageFetcher for UsageClient {
    fn fetch(&self, token: &AccessToken) -> Result<UsageSnapshot, UsageError> {
        self.fetch_usage(token)
    }
}

/// Parses a response body into a snapshot, defaulting missing fields.
fn parse_response(body: &str) -> Result<UsageSnapshot, UsageError> {
    let raw: UsageApiResponse = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to parse usage response");
        UsageError::NetworkFailure
    })?;
    Ok(raw.into_snapshot())
}

/// Collapses a transport error into the sanitized taxonomy.
///
/// The error chain is scanned for certificate language because reqwest does
/// not expose a dedicated predicate for TLS certificate failures.
fn map_transport_error(error: &reqwest::Error) -> UsageError {
    let mut source: Option<&dyn StdError> = Some(error);
    while let Some(err) = source {
        let text = err.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("self-signed") {
            warn!("Certificate error during usage fetch");
            return UsageError::TransportSecurityFailure;
        }
        source = err.source();
    }
    warn!(timeout = error.is_timeout(), "Network error during usage fetch");
    UsageError::NetworkFailure
}

// ============================================================================
// Tests
// ============================================================================
