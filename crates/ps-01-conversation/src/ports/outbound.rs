//! Driven Ports (SPI - Outbound Dependencies)

use crate::domain::TransferDraft;
use crate::error::BroadcastError;
use async_trait::async_trait;
use shared_types::{CredentialKind, Identity, TxHash};

/// A selectable option shown with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    /// Sent back as a selection payload
    pub value: String,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A reply for the messaging channel to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub identity: Identity,
    pub text: String,
    /// Option rows
    pub options: Vec<Vec<MenuOption>>,
}

impl OutboundMessage {
    pub fn new(identity: Identity, text: impl Into<String>) -> Self {
        Self {
            identity,
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<Vec<MenuOption>>) -> Self {
        self.options = options;
        self
    }
}

/// Delivers replies to the operator.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn emit(&self, message: OutboundMessage);
}

/// Identifiers of an accepted broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReceipt {
    pub transfer_id: TxHash,
    pub sequence_number: u64,
    /// Problems met after the transfer reached the node, shown with the
    /// submission notice
    pub notes: Vec<String>,
}

impl BroadcastReceipt {
    pub fn new(transfer_id: TxHash, sequence_number: u64) -> Self {
        Self {
            transfer_id,
            sequence_number,
            notes: Vec::new(),
        }
    }
}

/// Signs, broadcasts and registers a confirmed draft.
#[async_trait]
pub trait TransferBroadcaster: Send + Sync {
    async fn broadcast(
        &self,
        identity: &Identity,
        draft: &TransferDraft,
    ) -> Result<BroadcastReceipt, BroadcastError>;
}

/// Saved credentials offered as shortcuts at the endpoint and key prompts.
pub trait CredentialSource: Send + Sync {
    /// Menu options whose values have the form `cred:<id>`, most recently
    /// used first.
    fn saved(&self, kind: CredentialKind) -> Vec<MenuOption>;

    /// Secret behind a saved credential id.
    fn reveal(&self, id: &str, kind: CredentialKind) -> Option<String>;
}
