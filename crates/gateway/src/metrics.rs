/// Gauge: gateway build info, labelled with `version`.
pub const INFO: &str = "base_gateway_info";

/// Gauge: gateway is running (set to 1 at startup).
pub const UP: &str = "base_gateway_up";

/// Counter: `/query` requests handled, labelled with `outcome`.
pub const REQUESTS_TOTAL: &str = "base_gateway_requests_total";

/// Histogram: wall-clock time spent answering a `/query` request.
pub const REQUEST_DURATION_SECONDS: &str = "base_gateway_request_duration_seconds";

/// Counter: `eth_getLogs` windows scanned while looking for the latest batch.
pub const SCANNED_WINDOWS_TOTAL: &str = "base_gateway_scanned_windows_total";

/// Label key for version.
pub const LABEL_VERSION: &str = "version";

/// Label key for the request outcome.
pub const LABEL_OUTCOME: &str = "outcome";

/// Outcome label value for successful requests.
pub const OUTCOME_OK: &str = "ok";

/// Records startup metrics (INFO gauge with version label, UP gauge set to 1).
pub fn record_startup_metrics(version: &str) {
    metrics::gauge!(INFO, LABEL_VERSION => version.to_string()).set(1.0);
    metrics::gauge!(UP).set(1.0);
}

/// Records one handled request.
pub fn record_request(outcome: &'static str, elapsed_secs: f64) {
    metrics::counter!(REQUESTS_TOTAL, LABEL_OUTCOME => outcome).increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS).record(elapsed_secs);
}
