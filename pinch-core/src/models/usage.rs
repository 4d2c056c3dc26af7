//! Usage-related types.
//!
//! This module contains the types that flow from the usage endpoint to
//! subscribers:
//! - [`UsageSnapshot`] - One complete reading (or error marker)
//! - [`UsageBucket`] - One quota window
//! - [`ExtraUsage`] - Overage credits in minor currency units
//! - [`UsageLevel`] - Display band for a percentage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UsageError;

// ============================================================================
// Buckets
// ============================================================================

/// One quota window's utilization and reset time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket {
    /// Utilization percentage (0-100), as reported by the server.
    pub utilization: f64,
    /// When this window resets, if known.
    pub resets_at: Option<DateTime<Utc>>,
}

impl UsageBucket {
    /// Creates a bucket with the given utilization.
    pub fn new(utilization: f64) -> Self {
        Self {
            utilization,
            resets_at: None,
        }
    }

    /// Returns the remaining percentage (100 - used).
    pub fn remaining_percent(&self) -> f64 {
        (100.0 - self.utilization).max(0.0)
    }

    /// Returns the display band for this bucket.
    pub fn level(&self) -> UsageLevel {
        UsageLevel::for_percent(self.utilization)
    }

    /// Clamps utilization into [0, 100] and zeroes non-finite values.
    ///
    /// Called after parsing API responses so a malformed reading can never
    /// escape the client boundary.
    pub fn sanitize(&mut self) {
        if !self.utilization.is_finite() {
            self.utilization = 0.0;
        }
        self.utilization = self.utilization.clamp(0.0, 100.0);
    }

    /// Returns true if utilization is a finite value in [0, 100].
    pub fn is_valid(&self) -> bool {
        self.utilization.is_finite() && (0.0..=100.0).contains(&self.utilization)
    }
}

// ============================================================================
// Extra usage
// ============================================================================

/// Extra usage / overage credits info.
///
/// Monetary values are stored as integer minor units (cents) and converted
/// to major units only at the presentation boundary, via the `_major`
/// accessors. The `utilization` field is independently reported by the
/// server and is surfaced as-is, never recomputed from the minor-unit
/// fields (they may disagree).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraUsage {
    /// Whether extra usage is enabled for this account.
    pub enabled: bool,
    /// Monthly spending limit, in minor units (cents).
    pub monthly_limit_minor: i64,
    /// Credits used this month, in minor units (cents).
    pub used_credits_minor: i64,
    /// Server-reported utilization percentage.
    pub utilization: f64,
}

impl ExtraUsage {
    /// Monthly limit in major units (e.g., dollars), for display.
    pub fn monthly_limit_major(&self) -> f64 {
        self.monthly_limit_minor as f64 / 100.0
    }

    /// Used credits in major units (e.g., dollars), for display.
    pub fn used_credits_major(&self) -> f64 {
        self.used_credits_minor as f64 / 100.0
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// One immutable, complete reading (or error) of usage state.
///
/// A snapshot is either a successful reading with populated buckets or an
/// error marker, never a mix. Each poll cycle constructs exactly one and
/// atomically replaces the one held by shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Rolling 5-hour window.
    pub five_hour: UsageBucket,
    /// Rolling 7-day window (all models).
    pub seven_day: UsageBucket,
    /// Rolling 7-day Sonnet window.
    pub seven_day_sonnet: UsageBucket,
    /// Overage credits.
    pub extra_usage: ExtraUsage,
    /// Error marker; mutually exclusive with populated buckets.
    pub error: Option<UsageError>,
    /// When the fetch completed (UTC). Set at fetch completion, not at
    /// publish time. `None` only on the pre-first-update default.
    pub last_updated: Option<DateTime<Utc>>,
}

impl UsageSnapshot {
    /// Creates an error snapshot.
    pub fn from_error(error: UsageError) -> Self {
        Self {
            error: Some(error),
            last_updated: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Returns true if this snapshot is an error marker.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The highest utilization across all buckets.
    pub fn max_utilization(&self) -> f64 {
        self.five_hour
            .utilization
            .max(self.seven_day.utilization)
            .max(self.seven_day_sonnet.utilization)
    }

    /// Sanitizes every bucket in place.
    pub fn sanitize(&mut self) {
        self.five_hour.sanitize();
        self.seven_day.sanitize();
        self.seven_day_sonnet.sanitize();
    }
}

// ============================================================================
// Display bands
// ============================================================================

/// Display band for a utilization percentage.
///
/// Thresholds: below 50% is [`UsageLevel::Ok`], 50-80% is
/// [`UsageLevel::Warning`], 80% and above is [`UsageLevel::Critical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    /// Plenty of quota left.
    Ok,
    /// Approaching the limit.
    Warning,
    /// At or near the limit.
    Critical,
}

impl UsageLevel {
    /// Classifies a percentage into a band.
    pub fn for_percent(pct: f64) -> Self {
        if pct < 50.0 {
            UsageLevel::Ok
        } else if pct < 80.0 {
            UsageLevel::Warning
        } else {
            UsageLevel::Critical
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
