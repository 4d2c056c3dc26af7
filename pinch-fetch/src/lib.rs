// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pinch Fetch
//!
//! The network and credential edge of Pinch:
//!
//! - [`UsageClient`] - blocking HTTP client for the OAuth usage endpoint
//!   (read-only, non-billable), with sanitized error mapping
//! - [`FileTokenSource`] - reads the OAuth token fresh from the Claude Code
//!   credentials file on every poll, and classifies its health
//!
//! SECURITY MODEL:
//! - Only the read-only usage endpoint is ever called.
//! - Credentials are read live from the external file, never cached or
//!   written.
//! - Error messages are sanitized; no raw response bodies or network
//!   internals reach users, and token material is never logged.

pub mod client;
pub mod credentials;

pub use client::{UsageClient, OAUTH_BETA_HEADER, USAGE_API_URL};
pub use credentials::{credentials_file_path, FileTokenSource};
