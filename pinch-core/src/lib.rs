// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pinch Core
//!
//! Core types, models, and traits for the Pinch usage monitor.
//!
//! This crate provides the foundational abstractions used across all other
//! Pinch crates, including:
//!
//! - Domain models (usage buckets, snapshots, token health)
//! - The usage error taxonomy
//! - Trait definitions for the credential source and usage fetcher
//!
//! ## Key Types
//!
//! ### Usage Types
//! - [`UsageSnapshot`] - One complete reading (or error) of usage state
//! - [`UsageBucket`] - One quota window's utilization and reset time
//! - [`ExtraUsage`] - Overage credits, stored in minor currency units
//! - [`UsageLevel`] - Display band for a utilization percentage
//!
//! ### Credential Types
//! - [`AccessToken`] - Opaque OAuth token, redacted in debug output
//! - [`TokenHealth`] - Health classification of the credential source
//! - [`TokenStatus`] - The `ok`/`expiring`/`expired`/`missing` enum
//!
//! ### Errors & Traits
//! - [`UsageError`] - Sanitized error taxonomy carried on snapshots
//! - [`TokenSource`] - Reads credentials fresh on every poll
//! - [`UsageFetcher`] - Fetches one snapshot with one token

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::UsageError;

// Re-export all model types
pub use models::{
    // Credential types
    AccessToken,
    TokenHealth,
    TokenStatus,
    // Usage types
    ExtraUsage,
    UsageBucket,
    UsageLevel,
    UsageSnapshot,
};

// Re-export traits
pub use traits::{TokenSource, UsageFetcher};
