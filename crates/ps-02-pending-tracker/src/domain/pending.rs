//! Tracked transfers and the per-sender pending set.

use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, TxHash, U256};
use std::collections::BTreeMap;

/// A broadcast transfer that has not reached a terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// Chain-assigned hash returned at broadcast time.
    pub transfer_id: TxHash,
    /// Sender nonce consumed by this transfer.
    pub sequence_number: u64,
    /// Asset symbol.
    pub asset: String,
    /// Gas price (wei) used at broadcast.
    pub fee_paid: U256,
    pub created_at: Timestamp,
}

impl PendingTransfer {
    pub fn new(
        transfer_id: TxHash,
        sequence_number: u64,
        asset: impl Into<String>,
        fee_paid: U256,
        created_at: Timestamp,
    ) -> Self {
        Self {
            transfer_id,
            sequence_number,
            asset: asset.into(),
            fee_paid,
            created_at,
        }
    }

    /// Milliseconds since broadcast.
    pub fn age_ms(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

/// Pending transfers of one sender, ordered by sequence number.
///
/// Sequence numbers are unique and only ever inserted above the current
/// highest entry.
#[derive(Debug, Default, Clone)]
pub struct PendingSet {
    by_sequence: BTreeMap<u64, PendingTransfer>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, keeping the first entry per sequence.
    pub fn from_records(records: Vec<PendingTransfer>) -> Self {
        let mut by_sequence = BTreeMap::new();
        for record in records {
            by_sequence.entry(record.sequence_number).or_insert(record);
        }
        Self { by_sequence }
    }

    pub fn insert(&mut self, transfer: PendingTransfer) -> TrackerResult<()> {
        let sequence = transfer.sequence_number;
        if let Some(existing) = self.by_sequence.get(&sequence) {
            return Err(TrackerError::DuplicateSequence {
                sequence,
                existing: existing.transfer_id,
            });
        }
        if let Some(&highest) = self.by_sequence.keys().next_back() {
            if sequence < highest {
                return Err(TrackerError::SequenceOutOfOrder { sequence, highest });
            }
        }
        self.by_sequence.insert(sequence, transfer);
        Ok(())
    }

    /// Oldest pending transfer.
    pub fn lowest(&self) -> Option<&PendingTransfer> {
        self.by_sequence.values().next()
    }

    pub fn remove_sequence(&mut self, sequence: u64) -> Option<PendingTransfer> {
        self.by_sequence.remove(&sequence)
    }

    /// Remove the entry for `transfer_id` if it still holds its sequence.
    pub fn remove_transfer(&mut self, transfer: &PendingTransfer) -> Option<PendingTransfer> {
        match self.by_sequence.get(&transfer.sequence_number) {
            Some(held) if held.transfer_id == transfer.transfer_id => {
                self.by_sequence.remove(&transfer.sequence_number)
            }
            _ => None,
        }
    }

    /// Remove every entry at or above `sequence`.
    pub fn split_from(&mut self, sequence: u64) -> Vec<PendingTransfer> {
        self.by_sequence.split_off(&sequence).into_values().collect()
    }

    pub fn drain(&mut self) -> Vec<PendingTransfer> {
        std::mem::take(&mut self.by_sequence).into_values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingTransfer> {
        self.by_sequence.values()
    }

    pub fn to_vec(&self) -> Vec<PendingTransfer> {
        self.by_sequence.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sequence.is_empty()
    }
}
