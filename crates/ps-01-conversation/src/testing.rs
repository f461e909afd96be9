//! Test doubles for the conversation ports.
//!
//! Shared with the runtime and end-to-end tests.

use crate::domain::TransferDraft;
use crate::error::BroadcastError;
use crate::ports::outbound::{
    BroadcastReceipt, CredentialSource, MenuOption, MessageSink, OutboundMessage,
    TransferBroadcaster,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{CredentialKind, Identity, TxHash};

/// Sink that keeps every emitted message.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<OutboundMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().clone()
    }

    pub fn last(&self) -> Option<OutboundMessage> {
        self.messages.lock().last().cloned()
    }

    pub fn last_text(&self) -> String {
        self.last().map(|m| m.text).unwrap_or_default()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn emit(&self, message: OutboundMessage) {
        self.messages.lock().push(message);
    }
}

/// Credential source with a fixed list of entries.
#[derive(Debug, Default)]
pub struct StaticCredentials {
    entries: Vec<(String, CredentialKind, String, String)>,
}

impl StaticCredentials {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        id: &str,
        kind: CredentialKind,
        label: &str,
        secret: &str,
    ) -> Self {
        self.entries
            .push((id.to_string(), kind, label.to_string(), secret.to_string()));
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn saved(&self, kind: CredentialKind) -> Vec<MenuOption> {
        self.entries
            .iter()
            .filter(|(_, k, _, _)| *k == kind)
            .map(|(id, _, label, _)| MenuOption::new(label.clone(), format!("cred:{}", id)))
            .collect()
    }

    fn reveal(&self, id: &str, kind: CredentialKind) -> Option<String> {
        self.entries
            .iter()
            .find(|(i, k, _, _)| i == id && *k == kind)
            .map(|(_, _, _, secret)| secret.clone())
    }
}

/// Broadcaster that returns a preset result and records each draft.
#[derive(Debug)]
pub struct ScriptedBroadcaster {
    result: Mutex<Result<BroadcastReceipt, BroadcastError>>,
    calls: Mutex<Vec<(Identity, TransferDraft)>>,
}

impl ScriptedBroadcaster {
    pub fn succeeding(transfer_id: TxHash, sequence_number: u64) -> Self {
        Self {
            result: Mutex::new(Ok(BroadcastReceipt::new(transfer_id, sequence_number))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(cause: &str) -> Self {
        Self {
            result: Mutex::new(Err(BroadcastError(cause.to_string()))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_result(&self, result: Result<BroadcastReceipt, BroadcastError>) {
        *self.result.lock() = result;
    }

    pub fn calls(&self) -> Vec<(Identity, TransferDraft)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TransferBroadcaster for ScriptedBroadcaster {
    async fn broadcast(
        &self,
        identity: &Identity,
        draft: &TransferDraft,
    ) -> Result<BroadcastReceipt, BroadcastError> {
        self.calls.lock().push((identity.clone(), draft.clone()));
        self.result.lock().clone()
    }
}
