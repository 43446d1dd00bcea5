//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): total requests by method, status
//! - `relay_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Prometheus exposition on its own listener so scrapes never touch the
//!   relay's port
//! - Recording is a no-op until the exporter is installed, so tests run
//!   without it

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one completed relay request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
