use std::sync::Arc;
use tokio::sync::Mutex;

use crypto_tracker_core::CryptoTracker;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub tracker: CryptoTracker,

    /// Held for the whole of a pipeline run. Snapshot and log files are plain
    /// files, so concurrent page loads take turns instead of interleaving writes.
    pub run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(tracker: CryptoTracker) -> Arc<Self> {
        Arc::new(Self {
            tracker,
            run_lock: Mutex::new(()),
        })
    }
}
