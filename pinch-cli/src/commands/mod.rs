//! CLI command implementations.

pub mod check;
pub mod config;
pub mod usage;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};

use pinch_fetch::{FileTokenSource, UsageClient};
use pinch_monitor::UsageMonitor;
use pinch_store::{Settings, SharedState};

/// Wires the production stack: file credentials, HTTP client, shared state,
/// monitor. The poll interval comes from the settings file.
pub fn build_monitor() -> Result<(UsageMonitor, Arc<SharedState>)> {
    let state = Arc::new(SharedState::new());
    let tokens = Arc::new(FileTokenSource::new());
    let client = Arc::new(UsageClient::new().context("failed to initialize HTTP client")?);

    let monitor = UsageMonitor::new(Arc::clone(&state), tokens, client);
    monitor.update_interval(Settings::load().poll_interval);

    Ok((monitor, state))
}
