//! Prometheus text encoding.
//!
//! Subsystem crates register their metrics with the default registry (all
//! behind their `metrics` feature); this module only renders it.

use lazy_static::lazy_static;
use prometheus::{register_int_gauge_vec, Encoder, IntGaugeVec, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Constant 1, labelled with service name and version
    pub static ref BUILD_INFO: IntGaugeVec = register_int_gauge_vec!(
        "ps_build_info",
        "Build information",
        &["service", "version"]
    )
    .expect("Failed to register ps_build_info");
}

pub fn record_startup(service_name: &str) {
    BUILD_INFO
        .with_label_values(&[service_name, env!("CARGO_PKG_VERSION")])
        .set(1);
}

/// Encode the default registry as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsEncode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsEncode(e.to_string()))
}
