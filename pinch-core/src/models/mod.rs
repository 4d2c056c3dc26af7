//! Domain models for Pinch.
//!
//! ## Submodules
//!
//! - [`usage`] - Usage types (`UsageSnapshot`, `UsageBucket`, `ExtraUsage`)
//! - [`token`] - The opaque [`AccessToken`] credential wrapper
//! - [`health`] - Token health classification (`TokenHealth`, `TokenStatus`)

mod health;
mod token;
mod usage;

// Re-export everything at the models level
pub use health::{TokenHealth, TokenStatus};
pub use token::AccessToken;
pub use usage::{ExtraUsage, UsageBucket, UsageLevel, UsageSnapshot};
