//! Thread-safe container for the latest usage snapshot.
//!
//! One writer (the monitor) and any number of reader/subscriber threads.
//! The lock protects only the snapshot swap; subscriber callbacks run
//! outside it so a slow callback never blocks `get()`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use pinch_core::UsageSnapshot;

type Subscriber = Arc<dyn Fn(&UsageSnapshot) + Send + Sync>;

/// Single source of truth for the latest snapshot, with change callbacks.
///
/// Subscribers are invoked synchronously on the publishing thread, in
/// registration order, and see snapshots in exactly the order they were
/// published. Callers that need another execution context marshal from
/// inside their callback.
#[derive(Default)]
pub struct SharedState {
    snapshot: Mutex<UsageSnapshot>,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl SharedState {
    /// Creates a state holding an empty default snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replaces the held snapshot, then notifies subscribers.
    ///
    /// Notification is best-effort: a subscriber that panics is logged and
    /// the remaining subscribers still run. The held snapshot is already
    /// swapped before any callback fires, so state can never be corrupted
    /// by a failing subscriber.
    pub fn update(&self, snapshot: UsageSnapshot) {
        *self.snapshot.lock() = snapshot.clone();

        // Snapshot the subscriber list under its own lock. A subscriber
        // added while this publish is in flight sees only future publishes.
        let subscribers: Vec<Subscriber> = self.subscribers.lock().clone();
        for (index, callback) in subscribers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| callback(&snapshot)));
            if result.is_err() {
                warn!(subscriber = index, "Subscriber panicked during publish");
            }
        }
    }

    /// Returns the most recently published snapshot.
    ///
    /// Before the first update this is the empty default snapshot. The read
    /// is consistent even while an `update` is in progress.
    pub fn get(&self) -> UsageSnapshot {
        self.snapshot.lock().clone()
    }

    /// Registers a callback invoked on every future update.
    ///
    /// There is no replay of the current value; call [`SharedState::get`]
    /// once at subscribe time if the current snapshot is needed.
    pub fn subscribe(&self, callback: impl Fn(&UsageSnapshot) + Send + Sync + 'static) {
        self.subscribers.lock().push(Arc::new(callback));
    }
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("snapshot", &self.snapshot.lock())
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
