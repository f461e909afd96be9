//! # Tracker Registry
//!
//! One `PendingTransferTracker` per identity, created on the identity's first
//! broadcast attempt. Creating a tracker restores the sender's saved pending set.
//! Broadcasting with a different key replaces the identity's tracker; the
//! previous sender's set stays on disk.

use parking_lot::RwLock;
use ps_02_pending_tracker::{PendingStore, PendingTransferTracker, TrackerConfig};
use shared_types::{to_checksum, ChainClient, Identity, TimeSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub struct TrackerRegistry {
    config: TrackerConfig,
    store: Arc<dyn PendingStore>,
    clock: Arc<dyn TimeSource>,
    trackers: RwLock<HashMap<Identity, Arc<PendingTransferTracker>>>,
}

impl TrackerRegistry {
    pub fn new(
        config: TrackerConfig,
        store: Arc<dyn PendingStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            trackers: RwLock::new(HashMap::new()),
        }
    }

    /// The identity's tracker for `chain`'s sender, created if needed.
    pub fn attach(
        &self,
        identity: &Identity,
        chain: Arc<dyn ChainClient>,
    ) -> Arc<PendingTransferTracker> {
        let sender = chain.sender();
        if let Some(tracker) = self.get(identity) {
            if tracker.sender() == sender {
                return tracker;
            }
        }

        let mut trackers = self.trackers.write();
        // Another broadcast may have attached one meanwhile.
        if let Some(tracker) = trackers.get(identity) {
            if tracker.sender() == sender {
                return tracker.clone();
            }
        }

        let tracker = Arc::new(PendingTransferTracker::new(
            self.config.clone(),
            chain,
            self.store.clone(),
            self.clock.clone(),
        ));
        info!(identity = %identity, sender = %to_checksum(&sender), "Tracker attached");
        trackers.insert(identity.clone(), tracker.clone());
        tracker
    }

    pub fn get(&self, identity: &Identity) -> Option<Arc<PendingTransferTracker>> {
        self.trackers.read().get(identity).cloned()
    }

    /// Every registered tracker with its identity.
    pub fn all(&self) -> Vec<(Identity, Arc<PendingTransferTracker>)> {
        let mut all: Vec<_> = self
            .trackers
            .read()
            .iter()
            .map(|(identity, tracker)| (identity.clone(), tracker.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.trackers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ps_02_pending_tracker::{InMemoryPendingStore, PendingTrackerApi, PendingTransfer};
    use shared_types::{Address, ManualTimeSource, ScriptedChain, TxHash, U256};

    fn registry(store: Arc<InMemoryPendingStore>) -> TrackerRegistry {
        TrackerRegistry::new(
            TrackerConfig::default(),
            store,
            Arc::new(ManualTimeSource::new(0)),
        )
    }

    #[test]
    fn test_attach_reuses_tracker_for_same_sender() {
        let registry = registry(Arc::new(InMemoryPendingStore::new()));
        let chain = Arc::new(ScriptedChain::new(Address::repeat_byte(1)));
        let alice = Identity::new("alice");

        let first = registry.attach(&alice, chain.clone());
        let second = registry.attach(&alice, chain);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_new_sender_replaces_tracker() {
        let registry = registry(Arc::new(InMemoryPendingStore::new()));
        let alice = Identity::new("alice");

        registry.attach(&alice, Arc::new(ScriptedChain::new(Address::repeat_byte(1))));
        let replaced = registry.attach(&alice, Arc::new(ScriptedChain::new(Address::repeat_byte(2))));

        assert_eq!(replaced.sender(), Address::repeat_byte(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_attach_restores_saved_set() {
        let store = Arc::new(InMemoryPendingStore::new());
        let sender = Address::repeat_byte(3);
        store
            .save(
                &sender,
                &[PendingTransfer::new(TxHash::repeat_byte(9), 4, "USDT", U256::one(), 0)],
            )
            .unwrap();

        let registry = registry(store);
        let tracker = registry.attach(&Identity::new("bob"), Arc::new(ScriptedChain::new(sender)));
        assert_eq!(tracker.pending().len(), 1);
    }

    #[test]
    fn test_identities_are_independent() {
        let registry = registry(Arc::new(InMemoryPendingStore::new()));
        registry.attach(&Identity::new("b"), Arc::new(ScriptedChain::new(Address::repeat_byte(1))));
        registry.attach(&Identity::new("a"), Arc::new(ScriptedChain::new(Address::repeat_byte(1))));

        let identities: Vec<String> = registry.all().into_iter().map(|(i, _)| i.0).collect();
        assert_eq!(identities, vec!["a".to_string(), "b".to_string()]);
        assert!(registry.get(&Identity::new("c")).is_none());
    }
}
