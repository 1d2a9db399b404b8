//! Metrics collection and exposition.
//!
//! # Metrics
//! - `drive_times_api_requests_total` (counter): routing API calls by outcome
//! - `drive_times_api_request_duration_seconds` (histogram): routing API latency
//! - `drive_times_sampling_rounds_total` (counter): sampling rounds by outcome
//! - `drive_times_observations_stored_total` (counter): rows appended
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one routing API call.
pub fn record_api_request(outcome: &'static str, started: Instant) {
    metrics::counter!("drive_times_api_requests_total", "outcome" => outcome).increment(1);
    metrics::histogram!("drive_times_api_request_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record the end of a sampling round.
pub fn record_sampling_round(outcome: &'static str) {
    metrics::counter!("drive_times_sampling_rounds_total", "outcome" => outcome).increment(1);
}

/// Record rows appended to the store.
pub fn record_observations_stored(count: usize) {
    metrics::counter!("drive_times_observations_stored_total").increment(count as u64);
}
