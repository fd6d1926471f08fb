//! Metrics collection and exposition.
//!
//! # Metrics
//! - `admission_active_connections` (gauge): tracked streams
//! - `admission_admitted_total` (counter): admissions by kind, grace
//! - `admission_rejected_total` (counter): `AtCapacity` rejections by kind
//! - `admission_released_total` (counter): explicit releases
//! - `admission_reaped_total` (counter): polled streams expired by the reaper

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::admission::ConnectionKind;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn set_active_connections(count: usize) {
    metrics::gauge!("admission_active_connections").set(count as f64);
}

pub fn record_admitted(kind: ConnectionKind, grace: bool) {
    metrics::counter!(
        "admission_admitted_total",
        "kind" => kind.as_str(),
        "grace" => if grace { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_rejected(kind: ConnectionKind) {
    metrics::counter!("admission_rejected_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_released() {
    metrics::counter!("admission_released_total").increment(1);
}

pub fn record_reaped(count: usize) {
    metrics::counter!("admission_reaped_total").increment(count as u64);
}
