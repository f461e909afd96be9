//! Ports layer for the pending-transfer tracker.
//!
//! - Inbound (Driving): `PendingTrackerApi`
//! - Outbound (Driven): `PendingStore`; the chain is reached through
//!   `shared_types::ChainClient`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
