// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pinch Store
//!
//! State management for Pinch:
//!
//! - [`SharedState`] - thread-safe holder of the latest usage snapshot,
//!   with synchronous change notification for subscribers
//! - [`Settings`] - persisted user preferences; the core consumes only the
//!   poll interval
//!
//! SECURITY MODEL:
//! - Only usage metric data (percentages, timestamps) flows through shared
//!   state. No credentials or tokens.
//! - The settings file stores display preferences only; no authentication
//!   data is ever written to disk.

pub mod error;
pub mod settings;
pub mod state;

pub use error::StoreError;
pub use settings::Settings;
pub use state::SharedState;
