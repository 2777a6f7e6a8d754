//! Process-wide uptime and request counting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};

/// Start time and request counter, owned by the process and shared with handlers.
#[derive(Debug)]
pub struct ProcessMetrics {
    started: Instant,
    started_at: DateTime<Utc>,
    requests: AtomicU64,
}

impl ProcessMetrics {
    /// Start the clock now with a zero counter.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
            requests: AtomicU64::new(0),
        }
    }

    /// Count one inbound request and return the new total.
    pub fn record_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Requests counted so far.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Seconds since start, rounded to two decimals.
    pub fn uptime_seconds(&self) -> f64 {
        round2(self.started.elapsed().as_secs_f64())
    }

    /// Wall-clock start time.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for ProcessMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
