//! Sliding-window rate limiter keyed by caller identity.
//!
//! State lives in process memory and resets on restart. The read-prune-append
//! step runs under a single mutex, so two concurrent attempts for the same
//! caller can never both observe spare capacity.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::Utc;

/// Source of "now" in epoch milliseconds. Injected so tests can move time.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Recent attempts for one caller, with the window they were admitted under.
#[derive(Debug, Default)]
struct CallerWindow {
    window_ms: i64,
    timestamps: VecDeque<i64>,
}

impl CallerWindow {
    /// Drops every timestamp older than `now - window_ms`. Timestamps are
    /// appended in order, so the expired ones are always at the front.
    fn prune(&mut self, now: i64) {
        let cutoff = now.saturating_sub(self.window_ms);
        while self.timestamps.front().is_some_and(|&t| t < cutoff) {
            self.timestamps.pop_front();
        }
    }
}

pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, CallerWindow>>,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Records an attempt for `caller_id` if fewer than `max_per_window`
    /// attempts fall inside the trailing `window_ms`. Rejected attempts are
    /// not recorded.
    ///
    /// Callers whose windows have fully expired are forgotten on every call,
    /// so the map only holds callers with live attempts.
    pub fn try_acquire(&self, caller_id: &str, max_per_window: usize, window_ms: i64) -> bool {
        let now = self.clock.now_ms();
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        windows.retain(|_, window| {
            window.prune(now);
            !window.timestamps.is_empty()
        });

        let window = windows.entry(caller_id.to_string()).or_default();
        window.window_ms = window_ms;
        window.prune(now);

        if window.timestamps.len() >= max_per_window {
            // Zero ceiling on a fresh caller: nothing to keep.
            if window.timestamps.is_empty() {
                windows.remove(caller_id);
            }
            return false;
        }

        window.timestamps.push_back(now);
        true
    }

    /// Milliseconds until the oldest recorded attempt leaves the window.
    /// Zero when the caller has nothing recorded.
    pub fn retry_after_ms(&self, caller_id: &str, window_ms: i64) -> i64 {
        let now = self.clock.now_ms();
        let cutoff = now.saturating_sub(window_ms);
        let windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        windows
            .get(caller_id)
            .and_then(|window| window.timestamps.iter().find(|&&t| t >= cutoff))
            .map(|&oldest| {
                oldest
                    .saturating_add(window_ms)
                    .saturating_sub(now)
                    .saturating_add(1)
                    .max(0)
            })
            .unwrap_or(0)
    }
}
