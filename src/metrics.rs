//! Prometheus metrics for request traffic and article writes.
//!
//! These complement the JSON `/metrics` endpoint: the facade records into
//! whatever recorder the binary installs, and `/metrics/prometheus` renders it.

use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

// === Metric Name Constants ===

/// HTTP request counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Articles created counter metric name.
pub const METRIC_ARTICLES_CREATED: &str = "articles_created_total";
/// Articles updated counter metric name.
pub const METRIC_ARTICLES_UPDATED: &str = "articles_updated_total";
/// Articles deleted counter metric name.
pub const METRIC_ARTICLES_DELETED: &str = "articles_deleted_total";

/// Initialize all metric descriptions.
/// Call this once at startup, after installing a recorder.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests received");
    describe_counter!(METRIC_ARTICLES_CREATED, "Total number of articles created");
    describe_counter!(METRIC_ARTICLES_UPDATED, "Total number of articles updated");
    describe_counter!(METRIC_ARTICLES_DELETED, "Total number of articles deleted");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "prometheus recorder not installed");
            None
        }
    }
}

/// Drain histogram buckets every `every` so unscraped samples do not pile up.
///
/// The recorder installed by [`install_prometheus`] does no upkeep of its own.
pub fn spawn_upkeep(handle: PrometheusHandle, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Increment the HTTP request counter.
pub fn inc_http_requests(method: &str) {
    counter!(METRIC_HTTP_REQUESTS, "method" => method.to_string()).increment(1);
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, route: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "route" => route.to_string()).record(latency_ms);
}

/// Increment articles created counter.
pub fn inc_articles_created() {
    counter!(METRIC_ARTICLES_CREATED).increment(1);
}

/// Increment articles updated counter.
pub fn inc_articles_updated() {
    counter!(METRIC_ARTICLES_UPDATED).increment(1);
}

/// Increment articles deleted counter.
pub fn inc_articles_deleted() {
    counter!(METRIC_ARTICLES_DELETED).increment(1);
}

/// RAII guard for timing a request.
/// Records latency for its route when dropped.
pub struct LatencyTimer {
    start: Instant,
    route: String,
}

impl LatencyTimer {
    /// Start timing a request to `route`.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            route: route.into(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, &self.route);
    }
}
