//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by status
//! - `gateway_admitted_total` (counter): admitted requests by role
//! - `gateway_rejected_input_total` (counter): validator rejections by reason
//! - `gateway_rate_limited_total` (counter): quota denials by kind
//!   (`exceeded` vs `store_unavailable`)
//! - `gateway_request_duration_seconds` (histogram): latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener. Must run
/// inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed HTTP request.
pub fn record_request(status: u16, start: Instant) {
    counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an admitted request.
pub fn record_admission(role: &'static str) {
    counter!("gateway_admitted_total", "role" => role).increment(1);
}

/// Record a validator rejection.
pub fn record_rejected_input(reason: &'static str) {
    counter!("gateway_rejected_input_total", "reason" => reason).increment(1);
}

/// Record a quota denial. `kind` is `exceeded` for ordinary quota
/// exhaustion and `store_unavailable` for a fail-closed store fault.
pub fn record_rate_limited(kind: &'static str) {
    counter!("gateway_rate_limited_total", "kind" => kind).increment(1);
}
