//! # Conversation Metrics
//!
//! Enable with the `metrics` feature.
//!
//! - `conversation_sessions_started_total` - Counter of sessions created
//! - `conversation_validation_rejections_total` - Counter of rejected inputs (by state)
//! - `conversation_sessions_expired_total` - Counter of sessions purged by timeout
//! - `conversation_broadcasts_total` - Counter of broadcast attempts (by outcome)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref SESSIONS_STARTED: IntCounter = register_int_counter!(
        "conversation_sessions_started_total",
        "Total number of sessions created"
    )
    .expect("Failed to create SESSIONS_STARTED metric");

    pub static ref VALIDATION_REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "conversation_validation_rejections_total",
        "Total number of rejected inputs",
        &["state"]
    )
    .expect("Failed to create VALIDATION_REJECTIONS metric");

    pub static ref SESSIONS_EXPIRED: IntCounter = register_int_counter!(
        "conversation_sessions_expired_total",
        "Total number of sessions purged after the idle timeout"
    )
    .expect("Failed to create SESSIONS_EXPIRED metric");

    pub static ref BROADCASTS: IntCounterVec = register_int_counter_vec!(
        "conversation_broadcasts_total",
        "Total number of broadcast attempts",
        &["outcome"]
    )
    .expect("Failed to create BROADCASTS metric");
}

#[cfg(feature = "metrics")]
pub fn record_session_started() {
    SESSIONS_STARTED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_rejection(state: &str) {
    VALIDATION_REJECTIONS.with_label_values(&[state]).inc();
}

#[cfg(feature = "metrics")]
pub fn record_expired(count: usize) {
    SESSIONS_EXPIRED.inc_by(count as u64);
}

#[cfg(feature = "metrics")]
pub fn record_broadcast(outcome: &str) {
    BROADCASTS.with_label_values(&[outcome]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_session_started() {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_state: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_expired(_count: usize) {}

#[cfg(not(feature = "metrics"))]
pub fn record_broadcast(_outcome: &str) {}
