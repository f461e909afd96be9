//! Pending Transfer Tracker - core logic
//!
//! One tracker per sender account. The pending set sits behind a mutex that
//! is never held across an await; chain calls work on snapshots and the set
//! is updated afterwards.

use crate::domain::{replacement_fee, PendingSet, PendingTransfer};
use crate::error::{TrackerError, TrackerResult};
use crate::metrics;
use crate::ports::inbound::{CancelOutcome, PendingTrackerApi, ReconcileReport};
use crate::ports::outbound::PendingStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    short_hash, to_checksum, Address, ChainClient, ChainError, SequenceMode, TimeSource, Timestamp,
    TransferRequest,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tracker configuration
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Confirmations awaited for a replacement transfer
    pub confirmations: u64,
    /// Gas limit of the zero-value replacement
    pub cancel_gas_limit: u64,
    /// Drop every tracked transfer when the account shows no pending gap,
    /// even if their receipts are still absent
    pub clear_on_no_gap: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            confirmations: 1,
            cancel_gas_limit: 21_000,
            clear_on_no_gap: true,
        }
    }
}

/// Holds the cancellation flag for the lifetime of one `cancel()` call.
struct CancelGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CancelGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Pending-transfer tracker for one sender account.
pub struct PendingTransferTracker {
    config: TrackerConfig,
    sender: Address,
    chain: Arc<dyn ChainClient>,
    store: Arc<dyn PendingStore>,
    clock: Arc<dyn TimeSource>,
    pending: Mutex<PendingSet>,
    last_gap: Mutex<Option<u64>>,
    cancelling: AtomicBool,
}

impl PendingTransferTracker {
    /// Create a tracker for the chain client's sender, restoring any saved set.
    ///
    /// An unreadable saved set is logged and replaced by an empty one.
    pub fn new(
        config: TrackerConfig,
        chain: Arc<dyn ChainClient>,
        store: Arc<dyn PendingStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let sender = chain.sender();
        let restored = match store.load(&sender) {
            Ok(records) => PendingSet::from_records(records),
            Err(e) => {
                warn!(sender = %to_checksum(&sender), error = %e, "Discarding unreadable pending set");
                PendingSet::new()
            }
        };
        if !restored.is_empty() {
            info!(
                sender = %to_checksum(&sender),
                count = restored.len(),
                "Restored pending transfers"
            );
        }
        metrics::set_pending_transfers(restored.len());

        Self {
            config,
            sender,
            chain,
            store,
            clock,
            pending: Mutex::new(restored),
            last_gap: Mutex::new(None),
            cancelling: AtomicBool::new(false),
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancelling.load(Ordering::Acquire)
    }

    /// Save the current set. Failures are logged; the chain stays authoritative.
    fn persist(&self, snapshot: &[PendingTransfer]) {
        metrics::set_pending_transfers(snapshot.len());
        if let Err(e) = self.store.save(&self.sender, snapshot) {
            warn!(sender = %to_checksum(&self.sender), error = %e, "Failed to persist pending set");
        }
    }

    async fn run_cancel(&self, target: &PendingTransfer) -> TrackerResult<CancelOutcome> {
        let sequence = target.sequence_number;
        let failure = |cause: String| TrackerError::CancellationFailure { sequence, cause };

        let network_fee = self
            .chain
            .fee_estimate()
            .await
            .map_err(|e| failure(e.to_string()))?;
        let fee = replacement_fee(network_fee, target.fee_paid);

        let request =
            TransferRequest::replacement(self.sender, sequence, fee, self.config.cancel_gas_limit);
        let replacement_hash = self
            .chain
            .broadcast(request)
            .await
            .map_err(|e| failure(e.to_string()))?;

        info!(
            sequence,
            original = %short_hash(&target.transfer_id),
            replacement = %short_hash(&replacement_hash),
            network_fee = %network_fee,
            fee = %fee,
            "Replacement broadcast, waiting for confirmation"
        );

        let receipt = self
            .chain
            .wait_for_confirmation(replacement_hash, self.config.confirmations)
            .await
            .map_err(|e| failure(e.to_string()))?;

        if !receipt.succeeded() {
            let reverted = ChainError::Reverted(format!(
                "{:?} in block {}",
                replacement_hash, receipt.block_number
            ));
            return Err(failure(reverted.to_string()));
        }

        Ok(CancelOutcome {
            cancelled: target.clone(),
            replacement_hash,
            replacement_fee: fee,
            receipt,
        })
    }
}

#[async_trait]
impl PendingTrackerApi for PendingTransferTracker {
    fn record_broadcast(&self, transfer: PendingTransfer) -> TrackerResult<()> {
        let snapshot = {
            let mut set = self.pending.lock();
            set.insert(transfer.clone())?;
            set.to_vec()
        };
        info!(
            sequence = transfer.sequence_number,
            tx_hash = %short_hash(&transfer.transfer_id),
            asset = %transfer.asset,
            fee = %transfer.fee_paid,
            "Tracking pending transfer"
        );
        self.persist(&snapshot);
        Ok(())
    }

    async fn reconcile(&self) -> TrackerResult<ReconcileReport> {
        metrics::record_reconcile_run();
        let tracked = self.pending.lock().to_vec();

        let mut report = ReconcileReport::default();
        for transfer in tracked {
            if let Some(receipt) = self.chain.receipt(transfer.transfer_id).await? {
                if receipt.succeeded() {
                    report.confirmed.push(transfer);
                } else {
                    report.failed.push(transfer);
                }
            }
        }

        let confirmed_count = self
            .chain
            .sequence_count(self.sender, SequenceMode::Confirmed)
            .await?;
        let pending_count = self
            .chain
            .sequence_count(self.sender, SequenceMode::Pending)
            .await?;
        report.pending_gap = pending_count.saturating_sub(confirmed_count);

        let snapshot = {
            let mut set = self.pending.lock();
            for transfer in report.confirmed.iter().chain(report.failed.iter()) {
                set.remove_transfer(transfer);
            }

            if report.pending_gap == 0 && self.config.clear_on_no_gap && !set.is_empty() {
                if self.is_cancelling() {
                    debug!("Cancellation in flight, keeping tracked transfers");
                } else {
                    report.dropped = set.drain();
                }
            }
            report.remaining = set.len();
            set.to_vec()
        };
        *self.last_gap.lock() = Some(report.pending_gap);

        for transfer in &report.failed {
            warn!(
                sequence = transfer.sequence_number,
                tx_hash = %short_hash(&transfer.transfer_id),
                "Pending transfer failed on chain"
            );
        }
        if !report.dropped.is_empty() {
            warn!(
                count = report.dropped.len(),
                "No pending gap on chain, dropping tracked transfers without receipts"
            );
        }

        if report.changed() {
            metrics::record_removed("confirmed", report.confirmed.len());
            metrics::record_removed("failed", report.failed.len());
            metrics::record_removed("dropped", report.dropped.len());
            self.persist(&snapshot);
        }

        debug!(
            confirmed = report.confirmed.len(),
            failed = report.failed.len(),
            dropped = report.dropped.len(),
            remaining = report.remaining,
            gap = report.pending_gap,
            "Reconciled pending set"
        );
        Ok(report)
    }

    fn release_from(&self, next_sequence: u64) -> Vec<PendingTransfer> {
        if self.is_cancelling() {
            debug!(next_sequence, "Cancellation in flight, keeping tracked transfers");
            return Vec::new();
        }
        let (released, snapshot) = {
            let mut set = self.pending.lock();
            let released = set.split_from(next_sequence);
            (released, set.to_vec())
        };
        if !released.is_empty() {
            for transfer in &released {
                warn!(
                    sequence = transfer.sequence_number,
                    tx_hash = %short_hash(&transfer.transfer_id),
                    next_sequence,
                    "Tracked transfer no longer held by the node"
                );
            }
            metrics::record_removed("released", released.len());
            self.persist(&snapshot);
        }
        released
    }

    async fn cancel(&self) -> TrackerResult<CancelOutcome> {
        if self.pending.lock().is_empty() {
            return Err(TrackerError::NoPendingTransfer);
        }
        let _guard =
            CancelGuard::acquire(&self.cancelling).ok_or(TrackerError::CancellationInProgress)?;

        // Re-read under the guard; a reconcile may have emptied the set.
        let target = self
            .pending
            .lock()
            .lowest()
            .cloned()
            .ok_or(TrackerError::NoPendingTransfer)?;

        match self.run_cancel(&target).await {
            Ok(outcome) => {
                let snapshot = {
                    let mut set = self.pending.lock();
                    set.remove_sequence(target.sequence_number);
                    set.to_vec()
                };
                self.persist(&snapshot);
                metrics::record_removed("superseded", 1);
                metrics::record_cancellation("success");
                info!(
                    sequence = target.sequence_number,
                    replacement = %short_hash(&outcome.replacement_hash),
                    block = outcome.receipt.block_number,
                    "Pending transfer superseded"
                );
                Ok(outcome)
            }
            Err(e) => {
                metrics::record_cancellation("failure");
                warn!(sequence = target.sequence_number, error = %e, "Cancellation failed");
                Err(e)
            }
        }
    }

    fn pending(&self) -> Vec<PendingTransfer> {
        self.pending.lock().to_vec()
    }

    fn last_gap(&self) -> Option<u64> {
        *self.last_gap.lock()
    }

    fn clear(&self) -> Vec<PendingTransfer> {
        let cleared = self.pending.lock().drain();
        if !cleared.is_empty() {
            metrics::record_removed("cleared", cleared.len());
            info!(count = cleared.len(), "Cleared pending transfers");
        }
        self.persist(&[]);
        cleared
    }
}
