//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_heartbeats_total` (counter): heartbeats recorded
//! - `relay_errors_total` (counter): demo errors by `type`
//! - `relay_intake_entries_total` (counter): entries by `outcome`
//!   (`sent`, `retained`, `dropped`)
//! - `relay_intake_buffered_entries` (gauge): entries waiting to be sent
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_heartbeat() {
    counter!("relay_heartbeats_total").increment(1);
}

pub fn record_error(kind: &'static str) {
    counter!("relay_errors_total", "type" => kind).increment(1);
}

pub fn record_intake_sent(count: usize) {
    counter!("relay_intake_entries_total", "outcome" => "sent").increment(count as u64);
}

pub fn record_intake_retained(count: usize) {
    counter!("relay_intake_entries_total", "outcome" => "retained").increment(count as u64);
}

pub fn record_intake_dropped(count: u64) {
    counter!("relay_intake_entries_total", "outcome" => "dropped").increment(count);
}

pub fn record_buffered(count: usize) {
    gauge!("relay_intake_buffered_entries").set(count as f64);
}
