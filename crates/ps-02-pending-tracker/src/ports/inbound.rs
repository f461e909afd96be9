//! Driving Ports (API - Inbound)

use crate::domain::PendingTransfer;
use crate::error::TrackerResult;
use async_trait::async_trait;
use shared_types::{Receipt, TxHash, U256};

/// Result of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Transfers whose receipt reported success
    pub confirmed: Vec<PendingTransfer>,
    /// Transfers whose receipt reported failure
    pub failed: Vec<PendingTransfer>,
    /// Transfers discarded because the account showed no pending gap
    pub dropped: Vec<PendingTransfer>,
    /// Entries left in the pending set
    pub remaining: usize,
    /// Pending sequence count minus confirmed sequence count
    pub pending_gap: u64,
}

impl ReconcileReport {
    /// The chain reports at least one unconfirmed transfer for the account.
    pub fn has_unconfirmed(&self) -> bool {
        self.pending_gap > 0
    }

    pub fn changed(&self) -> bool {
        !(self.confirmed.is_empty() && self.failed.is_empty() && self.dropped.is_empty())
    }
}

/// Result of a successful cancellation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CancelOutcome {
    /// The superseded transfer
    pub cancelled: PendingTransfer,
    pub replacement_hash: TxHash,
    pub replacement_fee: U256,
    pub receipt: Receipt,
}

/// Pending-transfer tracker API
#[async_trait]
pub trait PendingTrackerApi: Send + Sync {
    /// Add a freshly broadcast transfer.
    fn record_broadcast(&self, transfer: PendingTransfer) -> TrackerResult<()>;

    /// Bring the pending set in line with the chain.
    async fn reconcile(&self) -> TrackerResult<ReconcileReport>;

    /// Stop tracking entries at or above `next_sequence`, the account's
    /// pending sequence count. The node no longer holds them.
    fn release_from(&self, next_sequence: u64) -> Vec<PendingTransfer>;

    /// Supersede the oldest pending transfer and wait for the replacement
    /// to confirm.
    async fn cancel(&self) -> TrackerResult<CancelOutcome>;

    /// Current pending set, lowest sequence first.
    fn pending(&self) -> Vec<PendingTransfer>;

    /// Gap observed by the last successful reconciliation.
    fn last_gap(&self) -> Option<u64>;

    /// Operator reset: discard every tracked transfer.
    fn clear(&self) -> Vec<PendingTransfer>;
}
