//! Best-effort network quiescence detection for rendered pages
//!
//! Request lifecycle events feed an in-flight set. The page counts as idle
//! once nothing is in flight and no request has started or settled for the
//! configured quiet period.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct IdleState {
    inflight: HashSet<String>,
    last_activity: Instant,
}

/// Shared, cheaply cloneable in-flight request tracker
#[derive(Debug, Clone)]
pub struct NetworkIdleTracker {
    state: Arc<Mutex<IdleState>>,
}

impl Default for NetworkIdleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkIdleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(IdleState {
                inflight: HashSet::new(),
                last_activity: Instant::now(),
            })),
        }
    }

    pub fn request_started(&self, request_id: &str) {
        let mut state = self.state.lock();
        state.inflight.insert(request_id.to_string());
        state.last_activity = Instant::now();
    }

    /// Finished or failed; unknown ids still count as activity
    pub fn request_settled(&self, request_id: &str) {
        let mut state = self.state.lock();
        state.inflight.remove(request_id);
        state.last_activity = Instant::now();
    }

    #[must_use]
    pub fn inflight(&self) -> usize {
        self.state.lock().inflight.len()
    }

    #[must_use]
    pub fn is_quiet(&self, quiet_period: Duration) -> bool {
        let state = self.state.lock();
        state.inflight.is_empty() && state.last_activity.elapsed() >= quiet_period
    }

    /// Poll until quiet or until `limit` elapses
    ///
    /// Returns `true` when the network went quiet, `false` on expiry. Expiry
    /// is not an error: the caller proceeds with whatever has loaded.
    pub async fn wait_for_idle(&self, quiet_period: Duration, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        loop {
            if self.is_quiet(quiet_period) {
                return true;
            }
            if Instant::now() >= deadline {
                debug!(
                    "Network idle wait expired with {} request(s) in flight",
                    self.inflight()
                );
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
