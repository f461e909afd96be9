//! # ps-02-pending-tracker
//!
//! Tracks transfers broadcast in leave-pending mode and supersedes them on
//! request.
//!
//! ## Overview
//!
//! - **Record**: every successful broadcast is added to the sender's
//!   pending set, keyed and ordered by sequence number (nonce).
//! - **Reconcile**: receipts remove confirmed and failed transfers; the
//!   confirmed/pending sequence gap is the authoritative "still pending"
//!   signal, local records are only a cache.
//! - **Cancel**: the oldest pending transfer is replaced by a zero-value
//!   self-transfer at the same sequence number with an escalated fee, and
//!   the call waits for that replacement to confirm.
//!
//! ## Lifecycle
//!
//! ```text
//! broadcast ──record──→ [PENDING] ──receipt──────────────→ removed (confirmed | failed)
//!                           │
//!                           ├──cancel, replacement confirms──→ removed (superseded)
//!                           │
//!                           └──clear / no pending gap───────→ removed (dropped)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! domain/pending.rs     - PendingTransfer, PendingSet (ordered by sequence)
//! domain/fee_policy.rs  - replacement fee computation
//! ports/inbound.rs      - PendingTrackerApi
//! ports/outbound.rs     - PendingStore
//! adapters/             - JSON file and in-memory stores
//! service.rs            - PendingTransferTracker
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryPendingStore, JsonFilePendingStore};
pub use domain::{replacement_fee, PendingSet, PendingTransfer};
pub use error::{TrackerError, TrackerResult};
pub use ports::inbound::{CancelOutcome, PendingTrackerApi, ReconcileReport};
pub use ports::outbound::PendingStore;
pub use service::{PendingTransferTracker, TrackerConfig};
