//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fetch_attempts_total` (counter): candidate attempts by result
//! - `fetch_attempt_duration_seconds` (histogram): per-attempt latency
//! - `fetch_requests_total` (counter): logical requests by outcome
//! - `fetch_cache_lookups_total` (counter): cache hits, misses and purges
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one candidate attempt (`success`, `auth`, `status`, `timeout`,
/// `network`, `parse`).
pub fn record_attempt(result: &'static str, elapsed: Duration) {
    metrics::counter!("fetch_attempts_total", "result" => result).increment(1);
    metrics::histogram!("fetch_attempt_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record how a logical request settled.
pub fn record_request(outcome: &'static str) {
    metrics::counter!("fetch_requests_total", "outcome" => outcome).increment(1);
}

/// Record a cache lookup result (`hit`, `miss`, `stale`, `forced`).
pub fn record_cache(result: &'static str) {
    metrics::counter!("fetch_cache_lookups_total", "result" => result).increment(1);
}
