//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_reloads_total` (counter): reload attempts by tenant, result
//! - `router_reload_duration_seconds` (histogram): time to rebuild a table
//! - `router_routes` (gauge): routes in the published table
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Lookups are not instrumented so `find` stays a pure traversal

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_reload(tenant: &str, ok: bool, elapsed: Duration) {
    let result = if ok { "ok" } else { "error" };
    counter!(
        "router_reloads_total",
        "tenant" => tenant.to_string(),
        "result" => result
    )
    .increment(1);
    histogram!("router_reload_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_route_count(count: usize) {
    gauge!("router_routes").set(count as f64);
}
