//! Prometheus metrics for the credential vault.

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;
#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Vault operations by operation and outcome
    pub static ref VAULT_OPERATIONS: IntCounterVec = register_int_counter_vec!(
        "ps_credential_vault_operations_total",
        "Credential vault operations",
        &["operation", "outcome"]
    )
    .expect("Failed to register ps_credential_vault_operations_total");
}

/// Record a vault operation (store / reveal / forget)
#[cfg(feature = "metrics")]
pub fn record_operation(operation: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    VAULT_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

#[cfg(not(feature = "metrics"))]
pub fn record_operation(_operation: &str, _ok: bool) {}
