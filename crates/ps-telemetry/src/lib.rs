//! # PS Telemetry
//!
//! Log subscriber installation and Prometheus text encoding.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ps_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PS_SERVICE_NAME` | `pending-sender` | Service name attached to logs |
//! | `PS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `PS_JSON_LOGS` | `false` | JSON formatted logs |
//! | `PS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use metrics::{encode_metrics, record_startup, BUILD_INFO};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    LoggingInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the log subscriber and record build info.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;
    record_startup(&config.service_name);

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Keeps telemetry active; logs shutdown on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
