//! Operator harness: one identity talking to a fully wired container.

use ps_01_conversation::testing::RecordingSink;
use ps_01_conversation::{ConversationResult, InboundEvent, SessionState};
use ps_02_pending_tracker::{InMemoryPendingStore, JsonFilePendingStore, PendingStore};
use ps_03_credentials::{CredentialVault, InMemoryVault, JsonFileVault};
use sender_runtime::adapters::ChainFactory;
use sender_runtime::testing::StaticChainFactory;
use sender_runtime::{CommandDispatcher, Dispatch, ReconcileLoop, RuntimeConfig, SenderContainer};
use shared_types::{Identity, ManualTimeSource, ScriptedChain, SigningSecret};
use std::path::Path;
use std::sync::Arc;

pub const ENDPOINT: &str = "https://mainnet.infura.io/v3/0123456789abcdef";
pub const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
pub const TARGET: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

pub const GWEI: u64 = 1_000_000_000;

pub fn secret() -> SigningSecret {
    SigningSecret::parse(KEY).unwrap()
}

/// Scripted chain for the fixture key's address.
pub fn chain() -> Arc<ScriptedChain> {
    Arc::new(ScriptedChain::new(secret().address()))
}

pub struct Operator {
    pub container: SenderContainer<RecordingSink>,
    pub dispatcher: CommandDispatcher<RecordingSink>,
    pub sink: Arc<RecordingSink>,
    pub clock: Arc<ManualTimeSource>,
    pub me: Identity,
}

impl Operator {
    pub fn new(
        chains: Arc<dyn ChainFactory>,
        vault: Arc<dyn CredentialVault>,
        store: Arc<dyn PendingStore>,
    ) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let clock = Arc::new(ManualTimeSource::new(1_700_000_000_000));
        let container = SenderContainer::new(
            RuntimeConfig::default(),
            sink.clone(),
            chains,
            vault,
            store,
            clock.clone(),
        )
        .unwrap();
        let dispatcher = container.dispatcher();
        Self {
            container,
            dispatcher,
            sink,
            clock,
            me: Identity::new("operator"),
        }
    }

    pub fn in_memory(chain: Arc<ScriptedChain>) -> Self {
        Self::new(
            factory(chain),
            Arc::new(InMemoryVault::new()),
            Arc::new(InMemoryPendingStore::new()),
        )
    }

    pub fn on_disk(chain: Arc<ScriptedChain>, dir: &Path) -> Self {
        Self::new(
            factory(chain),
            Arc::new(JsonFileVault::open(dir.join("credentials.json")).unwrap()),
            Arc::new(JsonFilePendingStore::new(dir.join("pending"))),
        )
    }

    pub fn reconciler(&self) -> ReconcileLoop<RecordingSink> {
        self.container.reconciler()
    }

    pub async fn text(&self, text: &str) -> Dispatch {
        self.dispatcher
            .dispatch(InboundEvent::text(self.me.clone(), text))
            .await
    }

    pub async fn select(&self, value: &str) -> Dispatch {
        self.dispatcher
            .dispatch(InboundEvent::selection(self.me.clone(), value))
            .await
    }

    /// Type the whole dialogue and confirm.
    pub async fn send_transfer(
        &self,
        asset: &str,
        amount: &str,
        fee_gwei: &str,
    ) -> ConversationResult<SessionState> {
        state(self.text("/transaction").await).unwrap();
        state(self.text(ENDPOINT).await).unwrap();
        state(self.text(KEY).await).unwrap();
        state(self.select(&format!("token:{}", asset)).await).unwrap();
        state(self.text(TARGET).await).unwrap();
        state(self.text(amount).await).unwrap();
        assert_eq!(state(self.text(fee_gwei).await), Ok(SessionState::Confirming));
        state(self.select("confirm:yes").await)
    }

    /// Value of the first menu option in the last message.
    pub fn first_option(&self) -> String {
        self.sink.last().unwrap().options[0][0].value.clone()
    }
}

fn factory(chain: Arc<ScriptedChain>) -> Arc<dyn ChainFactory> {
    let chains = StaticChainFactory::new();
    chains.register(chain);
    Arc::new(chains)
}

/// The conversation's answer; panics for dispatcher-handled commands.
pub fn state(dispatch: Dispatch) -> ConversationResult<SessionState> {
    match dispatch {
        Dispatch::Conversation(result) => result,
        other => panic!("expected a conversation result, got {:?}", other),
    }
}

/// Wait for a spawned `/cancel_pending`.
pub async fn finish(dispatch: Dispatch) {
    match dispatch {
        Dispatch::Cancelling(handle) => handle.await.unwrap(),
        other => panic!("expected a cancellation task, got {:?}", other),
    }
}
