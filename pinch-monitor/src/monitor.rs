//! The polling scheduler and its control surface.
//!
//! RECOVERY LOGIC:
//! - On 401, waits briefly and re-reads credentials (Claude Code may have
//!   refreshed the token out-of-band), up to a fixed retry bound.
//! - Checks token health proactively before each poll; only `missing`
//!   skips the network call.
//! - Backs off exponentially on repeated errors, capped at 5 minutes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{info, warn};

use pinch_core::{TokenSource, TokenStatus, UsageError, UsageFetcher, UsageSnapshot};
use pinch_store::settings::DEFAULT_POLL_INTERVAL;
use pinch_store::SharedState;

use crate::signal::{Signal, Wake};

/// Consecutive errors tolerated before backoff kicks in.
const BACKOFF_THRESHOLD: u32 = 3;

/// Worst-case seconds between polls under backoff.
const MAX_BACKOFF_SECS: u64 = 300;

// ============================================================================
// Tuning
// ============================================================================

/// Timing knobs for the monitor.
///
/// Defaults match production behavior; tests shrink the delays.
#[derive(Debug, Clone)]
pub struct MonitorTuning {
    /// Delay before each 401 retry.
    pub auth_retry_delay: Duration,
    /// Maximum retries on 401 before giving up for the cycle.
    pub auth_max_retries: u32,
    /// How long [`UsageMonitor::stop`] waits for the loop to exit.
    pub stop_timeout: Duration,
}

impl Default for MonitorTuning {
    fn default() -> Self {
        Self {
            auth_retry_delay: Duration::from_secs(5),
            auth_max_retries: 2,
            stop_timeout: Duration::from_secs(5),
        }
    }
}

// ============================================================================
// Monitor
// ============================================================================

/// Background scheduler that polls the usage endpoint at regular intervals.
///
/// All public operations are safe to call from any thread. Starting an
/// already-running monitor is not defined; callers guard against it.
pub struct UsageMonitor {
    inner: Arc<MonitorInner>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

struct MonitorInner {
    state: Arc<SharedState>,
    tokens: Arc<dyn TokenSource>,
    fetcher: Arc<dyn UsageFetcher>,
    interval_secs: AtomicU64,
    tuning: MonitorTuning,
    signal: Signal,
}

impl UsageMonitor {
    /// Creates a monitor with production tuning and the default interval.
    pub fn new(
        state: Arc<SharedState>,
        tokens: Arc<dyn TokenSource>,
        fetcher: Arc<dyn UsageFetcher>,
    ) -> Self {
        Self::with_tuning(state, tokens, fetcher, MonitorTuning::default())
    }

    /// Creates a monitor with explicit tuning.
    pub fn with_tuning(
        state: Arc<SharedState>,
        tokens: Arc<dyn TokenSource>,
        fetcher: Arc<dyn UsageFetcher>,
        tuning: MonitorTuning,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                state,
                tokens,
                fetcher,
                interval_secs: AtomicU64::new(DEFAULT_POLL_INTERVAL),
                tuning,
                signal: Signal::default(),
            }),
            thread: Mutex::new(None),
        }
    }

    /// Launches the polling loop on its own thread and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start(&self) -> std::io::Result<()> {
        self.inner.signal.reset();
        let inner = Arc::clone(&self.inner);
        let handle = thread::Builder::new()
            .name("pinch-usage-monitor".to_string())
            .spawn(move || inner.run())?;
        *self.thread.lock() = Some(handle);
        info!(
            interval = self.inner.interval_secs.load(Ordering::Relaxed),
            "Usage monitor started"
        );
        Ok(())
    }

    /// Signals termination, interrupts any in-progress sleep, and waits up
    /// to the stop timeout for the loop to exit. Best-effort join: returns
    /// anyway if the timeout elapses.
    pub fn stop(&self) {
        self.inner.signal.notify_stop();
        if let Some(handle) = self.thread.lock().take() {
            let deadline = Instant::now() + self.inner.tuning.stop_timeout;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                warn!("Monitor thread did not exit within the stop timeout");
            }
        }
        info!("Usage monitor stopped");
    }

    /// Updates the poll interval. Takes effect on the next cycle boundary,
    /// never mid-sleep. Zero is rejected.
    pub fn update_interval(&self, seconds: u64) {
        if seconds == 0 {
            warn!("Ignoring zero poll interval");
            return;
        }
        self.inner.interval_secs.store(seconds, Ordering::Relaxed);
        info!(interval = seconds, "Poll interval updated");
    }

    /// Forces an immediate re-poll: ends the current sleep (if any) early.
    /// Does not itself perform a fetch.
    pub fn reconnect(&self) {
        info!("Reconnect requested, forcing immediate poll");
        self.inner.signal.notify_force_poll();
    }

    /// Runs one poll cycle synchronously and returns the published
    /// snapshot. Does not touch the background loop's backoff counter.
    pub fn poll_once(&self) -> UsageSnapshot {
        self.inner.poll_once()
    }
}

impl MonitorInner {
    /// Main loop: poll, publish, sleep.
    fn run(&self) {
        let mut consecutive_errors: u32 = 0;
        while !self.signal.is_stopped() {
            let snapshot = self.poll_once();

            if let Some(error) = &snapshot.error {
                consecutive_errors += 1;
                warn!(consecutive = consecutive_errors, error = %error, "Poll error");
            } else {
                if consecutive_errors > 0 {
                    info!(after = consecutive_errors, "Poll recovered");
                }
                consecutive_errors = 0;
            }

            // Interval is re-read every cycle so changes apply without a
            // restart
            let base = self.interval_secs.load(Ordering::Relaxed);
            let sleep_secs = backoff_secs(base, consecutive_errors);
            match self.signal.sleep(Duration::from_secs(sleep_secs)) {
                Wake::Stop => break,
                Wake::Force | Wake::Timeout => {}
            }
        }
    }

    /// One poll cycle: health check, token read, fetch with 401 recovery,
    /// publish.
    fn poll_once(&self) -> UsageSnapshot {
        let health = self.tokens.check_health();
        match health.status {
            TokenStatus::Missing => {
                warn!(reason = %health.reason, "No credential source available");
                return self.publish_error(UsageError::MissingCredential);
            }
            // Still try: the source may have been refreshed since we checked
            TokenStatus::Expired => {
                warn!(reason = %health.reason, "Token expired, polling anyway");
            }
            TokenStatus::Expiring => info!(reason = %health.reason, "Token expiring soon"),
            TokenStatus::Ok => {}
        }

        let Some(token) = self.tokens.read_token() else {
            return self.publish_error(UsageError::MissingCredential);
        };

        let mut result = self.fetcher.fetch(&token);
        // Token dropped here; it is never retained across the publish
        drop(token);

        if matches!(result, Err(UsageError::Unauthorized)) {
            result = self.retry_unauthorized();
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(error) => UsageSnapshot::from_error(error),
        };
        self.state.update(snapshot.clone());
        snapshot
    }

    /// 401 recovery: wait, re-read credentials fresh, and retry, up to the
    /// configured bound. A persistent 401 becomes the distinguished
    /// reconnect-prompting error.
    fn retry_unauthorized(&self) -> Result<UsageSnapshot, UsageError> {
        let mut result = Err(UsageError::Unauthorized);

        for attempt in 1..=self.tuning.auth_max_retries {
            info!(
                attempt,
                max = self.tuning.auth_max_retries,
                delay_secs = self.tuning.auth_retry_delay.as_secs(),
                "Got 401, re-reading credentials after delay"
            );
            if !self.signal.wait_unless_stopped(self.tuning.auth_retry_delay) {
                break;
            }

            let Some(token) = self.tokens.read_token() else {
                continue;
            };
            result = self.fetcher.fetch(&token);

            match &result {
                Ok(_) => {
                    info!(attempt, "Recovered from 401");
                    break;
                }
                Err(UsageError::Unauthorized) => {}
                // Different failure kind: stop retrying, surface it as-is
                Err(_) => break,
            }
        }

        if matches!(result, Err(UsageError::Unauthorized)) {
            result = Err(UsageError::ReconnectRequired);
        }
        result
    }

    fn publish_error(&self, error: UsageError) -> UsageSnapshot {
        let snapshot = UsageSnapshot::from_error(error);
        self.state.update(snapshot.clone());
        snapshot
    }
}

/// Computes the sleep for a cycle: the configured base interval, doubled
/// per error past the threshold, capped at 5 minutes.
fn backoff_secs(base: u64, consecutive_errors: u32) -> u64 {
    if consecutive_errors <= BACKOFF_THRESHOLD {
        return base;
    }
    let exponent = (consecutive_errors - BACKOFF_THRESHOLD).min(32);
    base.saturating_mul(1u64 << exponent).min(MAX_BACKOFF_SECS)
}

// ============================================================================
// Tests
// ============================================================================
