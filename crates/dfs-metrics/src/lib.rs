use std::sync::OnceLock;
use std::time::Duration;

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

pub const OPTIMIZE_REQUESTS: &str = "dfs_optimize_requests_total";
pub const OPTIMIZE_FAILURES: &str = "dfs_optimize_failures_total";
pub const OPTIMIZE_DURATION: &str = "dfs_optimize_duration_seconds";
pub const PROJECTION_REQUESTS: &str = "dfs_projection_requests_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the process-wide Prometheus recorder.
///
/// The exporter does not open its own port: callers render the handle on an HTTP route.
/// Returns the existing handle on repeat calls, or `None` when another recorder already
/// owns the global slot.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            describe();
            info!("installed prometheus recorder");
            PROMETHEUS_HANDLE.get()
        }
        Err(err) => {
            warn!(error = %err, "failed to install prometheus recorder");
            PROMETHEUS_HANDLE.get()
        }
    }
}

/// Prometheus text exposition of everything recorded so far.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(PrometheusHandle::render)
}

fn describe() {
    describe_counter!(OPTIMIZE_REQUESTS, "Optimize calls received");
    describe_counter!(
        OPTIMIZE_FAILURES,
        "Optimize calls that ended in an error, by reason"
    );
    describe_histogram!(
        OPTIMIZE_DURATION,
        Unit::Seconds,
        "Wall time spent building all lineups for one optimize call"
    );
    describe_counter!(PROJECTION_REQUESTS, "Projection table reads");
}

pub fn record_optimize_success(elapsed: Duration) {
    counter!(OPTIMIZE_REQUESTS).increment(1);
    histogram!(OPTIMIZE_DURATION).record(elapsed.as_secs_f64());
}

pub fn record_optimize_failure(reason: &'static str) {
    counter!(OPTIMIZE_REQUESTS).increment(1);
    counter!(OPTIMIZE_FAILURES, "reason" => reason).increment(1);
}

pub fn record_projection_request() {
    counter!(PROJECTION_REQUESTS).increment(1);
}
