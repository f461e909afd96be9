//! Domain module for the pending-transfer tracker
//!
//! - pending: tracked transfers and the ordered pending set
//! - fee_policy: replacement fee escalation

pub mod fee_policy;
pub mod pending;

pub use fee_policy::{replacement_fee, REPLACEMENT_MULTIPLIER};
pub use pending::{PendingSet, PendingTransfer};
