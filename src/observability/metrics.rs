//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define API metrics (requests, latency, health verdict)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by endpoint, status
//! - `api_request_duration_seconds` (histogram): latency distribution
//! - `api_health_status` (gauge): 0=healthy, 1=degraded, 2=unhealthy
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op
//! - Labels limited to endpoint and status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::HealthStatus;

/// Start the Prometheus scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "api_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_health(status: HealthStatus) {
    let value = match status {
        HealthStatus::Healthy => 0.0,
        HealthStatus::Degraded => 1.0,
        HealthStatus::Unhealthy => 2.0,
    };
    metrics::gauge!("api_health_status").set(value);
}
