//! # Sender Container
//!
//! Builds the object graph once from [`RuntimeConfig`]:
//!
//! ```text
//! CredentialVault ──► CredentialAdapter ──┬──► VaultCredentialSource ─┐
//!                                         │                           │
//! ChainFactory ─┐                         ▼                           ▼
//! PendingStore ─┴► TrackerRegistry ──► ChainBroadcaster ──► ConversationService
//!                        │                                            │
//!                        └──────────► CommandDispatcher ◄─────────────┘
//!                                     ReconcileLoop
//! ```
//!
//! Everything is `Arc`-shared; the dispatcher and the reconcile loop are
//! cheap views over the same instances.

use crate::adapters::{
    ChainBroadcaster, ChainFactory, TrackerRegistry, TransferHistory, VaultCredentialSource,
};
use crate::container::config::{ConfigError, RuntimeConfig};
use crate::handlers::{CommandDispatcher, ReconcileLoop};
use anyhow::Context;
use ps_01_conversation::{ConversationApi, ConversationService, MessageSink};
use ps_02_pending_tracker::{JsonFilePendingStore, PendingStore};
use ps_03_credentials::{CredentialAdapter, CredentialVault, JsonFileVault};
use shared_types::{AssetTable, TimeSource};
use std::sync::Arc;
use tracing::info;

/// Conversation service as wired by the runtime.
pub type ConcreteConversation<S> = ConversationService<S, ChainBroadcaster, VaultCredentialSource>;

pub struct SenderContainer<S: MessageSink + 'static> {
    pub config: RuntimeConfig,
    pub conversation: Arc<ConcreteConversation<S>>,
    pub trackers: Arc<TrackerRegistry>,
    pub history: Arc<TransferHistory>,
    pub credentials: Arc<CredentialAdapter>,
    pub sink: Arc<S>,
    pub clock: Arc<dyn TimeSource>,
}

impl<S: MessageSink + 'static> SenderContainer<S> {
    pub fn new(
        config: RuntimeConfig,
        sink: Arc<S>,
        chains: Arc<dyn ChainFactory>,
        vault: Arc<dyn CredentialVault>,
        store: Arc<dyn PendingStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ConfigError> {
        let credentials = Arc::new(CredentialAdapter::new(vault, clock.clone()));
        let trackers = Arc::new(TrackerRegistry::new(
            config.tracker_config(),
            store,
            clock.clone(),
        ));
        let history = Arc::new(TransferHistory::new());

        let broadcaster = Arc::new(ChainBroadcaster::new(
            chains,
            trackers.clone(),
            history.clone(),
            credentials.clone(),
            clock.clone(),
            config.chain.token_gas_limit,
            config.tracker.allow_stacked_pending,
        ));
        let conversation = Arc::new(ConversationService::new(
            config.conversation_config()?,
            AssetTable::mainnet(),
            sink.clone(),
            broadcaster,
            Arc::new(VaultCredentialSource::new(credentials.clone())),
            clock.clone(),
        ));

        Ok(Self {
            config,
            conversation,
            trackers,
            history,
            credentials,
            sink,
            clock,
        })
    }

    /// Wire the container over the JSON files under `data_dir`.
    pub fn open(
        config: RuntimeConfig,
        sink: Arc<S>,
        chains: Arc<dyn ChainFactory>,
        clock: Arc<dyn TimeSource>,
    ) -> anyhow::Result<Self> {
        let vault_path = config.vault_path();
        let vault = JsonFileVault::open(&vault_path)
            .with_context(|| format!("opening credential vault {}", vault_path.display()))?;
        let store = JsonFilePendingStore::new(config.pending_dir());
        info!(
            data_dir = %config.storage.data_dir.display(),
            "Storage opened"
        );

        let container = Self::new(config, sink, chains, Arc::new(vault), Arc::new(store), clock)?;
        Ok(container)
    }

    pub fn dispatcher(&self) -> CommandDispatcher<S> {
        let conversation: Arc<dyn ConversationApi> = self.conversation.clone();
        CommandDispatcher::new(
            conversation,
            self.trackers.clone(),
            self.history.clone(),
            self.sink.clone(),
            self.clock.clone(),
        )
    }

    pub fn reconciler(&self) -> ReconcileLoop<S> {
        let conversation: Arc<dyn ConversationApi> = self.conversation.clone();
        ReconcileLoop::new(conversation, self.trackers.clone(), self.sink.clone())
    }
}
