//! # ps-01-conversation
//!
//! Drives an operator through a guided dialogue that collects RPC
//! credentials and transfer parameters, then hands the finished draft to a
//! broadcaster.
//!
//! ## State Machine
//!
//! ```text
//! IDLE → AWAITING_ENDPOINT → AWAITING_KEY → AWAITING_ASSET → AWAITING_TARGET
//!      → AWAITING_AMOUNT → AWAITING_FEE → CONFIRMING → { COMPLETED | CANCELLED }
//! ```
//!
//! - Invalid input never advances or mutates the session.
//! - `/cancel` is accepted from any state and removes the session.
//! - A session idle for longer than the timeout is purged on its next event,
//!   before the event is looked at.
//! - A failed broadcast leaves the session in `CONFIRMING` so it can be
//!   retried.
//!
//! ## Module Structure
//!
//! ```text
//! domain/validation.rs - per-field input rules
//! domain/session.rs    - Session, Stage (typed data per state)
//! domain/store.rs      - SessionStore with expiry
//! domain/machine.rs    - transition table and StateMachine
//! prompts.rs           - operator-facing texts and menus
//! ports/inbound.rs     - ConversationApi, InboundEvent, Command
//! ports/outbound.rs    - MessageSink, TransferBroadcaster, CredentialSource
//! service.rs           - ConversationService
//! testing.rs           - recording and scripted port doubles
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod prompts;
pub mod service;

/// Port doubles for tests.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use domain::{
    Credentials, Field, Session, SessionState, SessionStore, Stage, StateMachine, TransferDraft,
    ValidationRules, TRANSITIONS,
};
pub use error::{BroadcastError, ConversationError, ConversationResult, ValidationError};
pub use ports::inbound::{Command, ConversationApi, EventPayload, InboundEvent};
pub use ports::outbound::{
    BroadcastReceipt, CredentialSource, MenuOption, MessageSink, OutboundMessage,
    TransferBroadcaster,
};
pub use service::{ConversationConfig, ConversationService};
