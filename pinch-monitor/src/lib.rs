// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Pinch Monitor
//!
//! The background polling scheduler: a dedicated thread that reads the
//! token fresh each cycle, fetches usage, classifies failures, retries 401s
//! with re-read credentials, backs off exponentially on repeated errors,
//! and publishes every result to shared state.
//!
//! The control surface ([`UsageMonitor::start`], [`UsageMonitor::stop`],
//! [`UsageMonitor::update_interval`], [`UsageMonitor::reconnect`],
//! [`UsageMonitor::poll_once`]) is safe to call from any thread.
//!
//! SECURITY MODEL:
//! - The OAuth token is read fresh on each poll, used for one fetch, and
//!   dropped. Nothing here retains a credential across cycles.
//! - Only the read-only usage fetcher is ever invoked; no billable calls.

mod monitor;
mod signal;

pub use monitor::{MonitorTuning, UsageMonitor};
