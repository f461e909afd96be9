//! Ports layer for the conversation subsystem.
//!
//! - Inbound (Driving): `ConversationApi` event intake
//! - Outbound (Driven): `MessageSink`, `TransferBroadcaster`, `CredentialSource`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
