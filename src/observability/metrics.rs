//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method and status
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_upstream_errors_total` (counter): failed upstream attempts

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
///
/// Failure to install is logged, not fatal: the edge serves traffic either
/// way and the recording macros become no-ops.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint");
        }
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("edge_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

/// Record a failed upstream attempt.
pub fn record_upstream_error() {
    metrics::counter!("edge_upstream_errors_total").increment(1);
}
