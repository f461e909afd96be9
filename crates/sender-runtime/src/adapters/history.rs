//! Transfers broadcast during this process lifetime, per identity.

use parking_lot::RwLock;
use shared_types::{Identity, Timestamp, TxHash};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryKind {
    /// Token transfer; `amount` is already formatted in the asset's units.
    Transfer { asset: String, amount: String },
    /// Zero-value replacement superseding sequence `replaced`.
    Cancellation { replaced: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tx_hash: TxHash,
    pub sequence_number: u64,
    pub kind: HistoryKind,
    pub at: Timestamp,
}

#[derive(Debug, Default)]
pub struct TransferHistory {
    entries: RwLock<HashMap<Identity, Vec<HistoryEntry>>>,
}

impl TransferHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, identity: &Identity, entry: HistoryEntry) {
        self.entries
            .write()
            .entry(identity.clone())
            .or_default()
            .push(entry);
    }

    /// Newest first.
    pub fn entries(&self, identity: &Identity) -> Vec<HistoryEntry> {
        let mut entries = self
            .entries
            .read()
            .get(identity)
            .cloned()
            .unwrap_or_default();
        entries.reverse();
        entries
    }
}
