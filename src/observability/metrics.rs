//! Metrics collection and exposition.
//!
//! # Metrics
//! - `emojify_api_requests_total` (counter): requests by handler, status
//! - `emojify_api_request_duration_seconds` (histogram): latency by handler
//! - `emojify_api_backend_calls_total` (counter): backend calls by service, operation, outcome
//! - `emojify_api_backend_call_duration_seconds` (histogram): backend latency
//! - `emojify_api_injected_faults_total` (counter): synthetic failures by kind
//!
//! Recording without an installed exporter is a no-op, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(handler: &'static str, status: u16, start: Instant) {
    counter!(
        "emojify_api_requests_total",
        "handler" => handler,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("emojify_api_request_duration_seconds", "handler" => handler)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_backend_call(
    service: &'static str,
    operation: &'static str,
    outcome: &'static str,
    start: Instant,
) {
    counter!(
        "emojify_api_backend_calls_total",
        "service" => service,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "emojify_api_backend_call_duration_seconds",
        "service" => service,
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_injected_fault(kind: &'static str) {
    counter!("emojify_api_injected_faults_total", "kind" => kind).increment(1);
}
