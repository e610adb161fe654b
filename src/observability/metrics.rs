//! Metrics collection and exposition.
//!
//! # Metrics
//! - `requests_total` (counter): calls by operation and response status
//! - `request_duration_seconds` (histogram): latency by operation
//! - `store_errors_total` (counter): unknown errors by operation

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed API call.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    counter!("requests_total", "operation" => operation, "status" => status.to_string())
        .increment(1);
    histogram!("request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record a call that failed for a reason other than bad input.
pub fn record_store_error(operation: &'static str) {
    counter!("store_errors_total", "operation" => operation).increment(1);
}
