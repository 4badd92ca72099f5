//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by handler, status
//! - `site_request_duration_seconds` (histogram): handler latency
//! - `site_csp_reports_total` (counter): violation reports by directive
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! `--check` runs never need the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one dispatched request.
pub fn record_request(handler: &str, status: u16, start: Instant) {
    counter!(
        "site_requests_total",
        "handler" => handler.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("site_request_duration_seconds", "handler" => handler.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one CSP violation report. `directive` must come from a fixed
/// set; callers pass it through `security::csp::directive_label`.
pub fn record_csp_report(directive: &'static str) {
    counter!("site_csp_reports_total", "directive" => directive).increment(1);
}
