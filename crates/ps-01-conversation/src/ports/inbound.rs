//! Driving Ports (API - Inbound)

use crate::domain::SessionState;
use crate::error::ConversationResult;
use async_trait::async_trait;
use shared_types::Identity;

/// What the operator sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Free text, including `/commands`
    Text(String),
    /// Menu choice in `key:value` form
    Selection(String),
}

/// One inbound event from the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub identity: Identity,
    pub payload: EventPayload,
}

impl InboundEvent {
    pub fn text(identity: Identity, text: impl Into<String>) -> Self {
        Self {
            identity,
            payload: EventPayload::Text(text.into()),
        }
    }

    pub fn selection(identity: Identity, value: impl Into<String>) -> Self {
        Self {
            identity,
            payload: EventPayload::Selection(value.into()),
        }
    }
}

/// Operator commands, typed as `/name` or chosen as `menu:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Transaction,
    Cancel,
    Status,
    History,
    CancelPending,
    Clear,
    Unknown(String),
}

impl Command {
    pub fn parse(name: &str) -> Self {
        // Chat clients may append the bot name: /start@some_bot
        let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();
        match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "transaction" => Self::Transaction,
            "cancel" => Self::Cancel,
            "status" => Self::Status,
            "history" => Self::History,
            "cancel_pending" => Self::CancelPending,
            "clear" => Self::Clear,
            _ => Self::Unknown(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::Transaction => "transaction",
            Self::Cancel => "cancel",
            Self::Status => "status",
            Self::History => "history",
            Self::CancelPending => "cancel_pending",
            Self::Clear => "clear",
            Self::Unknown(name) => name,
        }
    }

    /// The command carried by a payload, if it is one.
    pub fn from_payload(payload: &EventPayload) -> Option<Self> {
        match payload {
            EventPayload::Text(text) => {
                let name = text.trim().strip_prefix('/')?.split_whitespace().next()?;
                Some(Self::parse(name))
            }
            EventPayload::Selection(value) => match value.split_once(':') {
                Some(("menu", name)) => Some(Self::parse(name)),
                _ => None,
            },
        }
    }
}

/// Conversation API
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Process one event to completion. The returned state is the
    /// identity's state afterwards; errors have already been reported to
    /// the operator.
    async fn handle_event(&self, event: InboundEvent) -> ConversationResult<SessionState>;

    fn session_state(&self, identity: &Identity) -> Option<SessionState>;

    /// Drop the identity's session without messaging the operator.
    fn reset(&self, identity: &Identity) -> Option<SessionState>;

    /// Purge every expired session, notifying its owner.
    async fn purge_expired(&self) -> usize;
}
