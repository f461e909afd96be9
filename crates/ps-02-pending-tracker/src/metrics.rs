//! # Tracker Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `tracker_pending_transfers` - Gauge of tracked pending transfers
//! - `tracker_reconcile_runs_total` - Counter of reconciliation passes
//! - `tracker_transfers_removed_total` - Counter of removed transfers (by reason)
//! - `tracker_cancellations_total` - Counter of cancellations (by outcome)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref PENDING_TRANSFERS: IntGauge = register_int_gauge!(
        "tracker_pending_transfers",
        "Number of transfers currently tracked as pending"
    )
    .expect("Failed to create PENDING_TRANSFERS metric");

    pub static ref RECONCILE_RUNS: IntCounter = register_int_counter!(
        "tracker_reconcile_runs_total",
        "Total number of reconciliation passes"
    )
    .expect("Failed to create RECONCILE_RUNS metric");

    pub static ref TRANSFERS_REMOVED: IntCounterVec = register_int_counter_vec!(
        "tracker_transfers_removed_total",
        "Total number of transfers removed from the pending set",
        &["reason"]
    )
    .expect("Failed to create TRANSFERS_REMOVED metric");

    pub static ref CANCELLATIONS: IntCounterVec = register_int_counter_vec!(
        "tracker_cancellations_total",
        "Total number of cancellation attempts",
        &["outcome"]
    )
    .expect("Failed to create CANCELLATIONS metric");
}

#[cfg(feature = "metrics")]
pub fn set_pending_transfers(count: usize) {
    PENDING_TRANSFERS.set(count as i64);
}

#[cfg(feature = "metrics")]
pub fn record_reconcile_run() {
    RECONCILE_RUNS.inc();
}

/// Record transfers removed with reason (confirmed, failed, dropped, released, superseded, cleared)
#[cfg(feature = "metrics")]
pub fn record_removed(reason: &str, count: usize) {
    TRANSFERS_REMOVED
        .with_label_values(&[reason])
        .inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_cancellation(outcome: &str) {
    CANCELLATIONS.with_label_values(&[outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn set_pending_transfers(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_reconcile_run() {}

#[cfg(not(feature = "metrics"))]
pub fn record_removed(_reason: &str, _count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_cancellation(_outcome: &str) {}
