//! Metrics collection and exposition.
//!
//! # Metrics
//! - `onlysports_requests_total` (counter): requests by handler, status
//! - `onlysports_request_duration_seconds` (histogram): latency by handler
//! - `onlysports_upstream_requests_total` (counter): outbound calls by upstream, outcome
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op, so tests need no setup
//! - Labels are static strings; URLs and paths never become labels

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Outcome label for an outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success,
    ErrorStatus,
    Unreachable,
}

impl UpstreamOutcome {
    fn as_str(self) -> &'static str {
        match self {
            UpstreamOutcome::Success => "success",
            UpstreamOutcome::ErrorStatus => "error_status",
            UpstreamOutcome::Unreachable => "unreachable",
        }
    }
}

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(handler: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "onlysports_requests_total",
        "handler" => handler,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("onlysports_request_duration_seconds", "handler" => handler)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(upstream: &'static str, outcome: UpstreamOutcome) {
    metrics::counter!(
        "onlysports_upstream_requests_total",
        "upstream" => upstream,
        "outcome" => outcome.as_str()
    )
    .increment(1);
}
