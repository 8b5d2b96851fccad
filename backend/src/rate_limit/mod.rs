//! Per-client sliding window rate limiting
//!
//! Each client key keeps the timestamps of its admitted requests in
//! arrival order. A request is admitted while fewer than `max_requests`
//! of those timestamps fall inside the trailing window.

mod middleware;

pub use middleware::{client_key, rate_limit};
pub(crate) use middleware::peer_addr;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// A sliding window rate limiter keyed by client identifier.
///
/// All state sits behind one mutex, so the evict/compare/append sequence
/// for a key is atomic with respect to every other caller.
pub struct RateLimiter {
    /// Admitted request timestamps per client key, oldest first
    requests: Mutex<HashMap<String, VecDeque<Instant>>>,
    /// Maximum requests admitted per window
    max_requests: usize,
    /// Length of the trailing window
    window: Duration,
}

impl RateLimiter {
    /// Create a new rate limiter.
    ///
    /// # Arguments
    ///
    /// * `max_requests` - Maximum requests admitted per window (0 rejects everything)
    /// * `window` - Length of the sliding window
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    /// Check whether a request from `key` is admitted, recording it if so.
    ///
    /// Rejected attempts are not recorded.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    /// [`allow`](Self::allow) evaluated at an explicit instant.
    ///
    /// Callers must pass non-decreasing instants per key.
    pub fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = now.checked_sub(self.window);

        let entry = requests.entry(key.to_string()).or_default();
        if let Some(cutoff) = cutoff {
            evict_stale(entry, cutoff);
        }

        if entry.len() >= self.max_requests {
            if entry.is_empty() {
                requests.remove(key);
            }
            return false;
        }

        entry.push_back(now);
        true
    }

    /// Drop every key whose history has fully aged out of the window.
    pub fn cleanup(&self) {
        let mut requests = self.requests.lock().unwrap_or_else(|e| e.into_inner());
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return;
        };

        let before = requests.len();
        requests.retain(|_, times| {
            evict_stale(times, cutoff);
            !times.is_empty()
        });
        debug!(removed = before - requests.len(), remaining = requests.len(), "Rate limiter cleanup");
    }

    /// Number of client keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start a background cleanup task.
    ///
    /// Stale keys are otherwise only evicted when the same client returns,
    /// so this bounds memory held by one-off clients.
    pub fn start_cleanup_task(self: &Arc<Self>, interval: Duration) {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            loop {
                interval_timer.tick().await;
                limiter.cleanup();
            }
        });
    }
}

/// Pop timestamps at or before `cutoff`; the deque is time-ordered.
fn evict_stale(times: &mut VecDeque<Instant>, cutoff: Instant) {
    while times.front().is_some_and(|&t| t <= cutoff) {
        times.pop_front();
    }
}
