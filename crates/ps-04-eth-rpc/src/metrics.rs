//! Prometheus metrics for the JSON-RPC client.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;
#[cfg(feature = "metrics")]
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};
use std::time::Duration;

#[cfg(feature = "metrics")]
lazy_static! {
    /// JSON-RPC requests by method and outcome
    pub static ref RPC_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "ps_rpc_requests_total",
        "JSON-RPC requests sent to the chain endpoint",
        &["method", "outcome"]
    )
    .expect("Failed to register ps_rpc_requests_total");

    /// JSON-RPC request latency by method
    pub static ref RPC_LATENCY: HistogramVec = register_histogram_vec!(
        "ps_rpc_request_seconds",
        "JSON-RPC request latency",
        &["method"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register ps_rpc_request_seconds");
}

#[cfg(feature = "metrics")]
pub fn record_request(method: &str, ok: bool, elapsed: Duration) {
    let outcome = if ok { "ok" } else { "error" };
    RPC_REQUESTS.with_label_values(&[method, outcome]).inc();
    RPC_LATENCY
        .with_label_values(&[method])
        .observe(elapsed.as_secs_f64());
}

#[cfg(not(feature = "metrics"))]
pub fn record_request(_method: &str, _ok: bool, _elapsed: Duration) {}
