//! In-memory pending store for tests and ephemeral runs.

use crate::domain::PendingTransfer;
use crate::error::TrackerResult;
use crate::ports::outbound::PendingStore;
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    sets: RwLock<HashMap<Address, Vec<PendingTransfer>>>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PendingStore for InMemoryPendingStore {
    fn load(&self, sender: &Address) -> TrackerResult<Vec<PendingTransfer>> {
        Ok(self.sets.read().get(sender).cloned().unwrap_or_default())
    }

    fn save(&self, sender: &Address, transfers: &[PendingTransfer]) -> TrackerResult<()> {
        self.sets.write().insert(*sender, transfers.to_vec());
        Ok(())
    }
}
