//! # Adapters
//!
//! Port implementations connecting the subsystems:
//!
//! - `ChainBroadcaster` implements the conversation's `TransferBroadcaster`
//!   over a `ChainClient`, and hands each broadcast to the tracker registry.
//! - `VaultCredentialSource` implements `CredentialSource` over the vault.
//! - `ConsoleSink` implements `MessageSink` on stdout.

pub mod broadcaster;
pub mod chain;
pub mod console;
pub mod credentials;
pub mod history;
pub mod trackers;

pub use broadcaster::ChainBroadcaster;
pub use chain::{ChainFactory, RpcChainFactory};
pub use console::{parse_line, render, ConsoleSink};
pub use credentials::VaultCredentialSource;
pub use history::{HistoryEntry, HistoryKind, TransferHistory};
pub use trackers::TrackerRegistry;
