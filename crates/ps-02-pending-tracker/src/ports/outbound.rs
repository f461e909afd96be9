//! Driven Ports (SPI - Outbound Dependencies)

use crate::domain::PendingTransfer;
use crate::error::TrackerResult;
use shared_types::Address;

/// Durable copy of a sender's pending set.
///
/// Local records are a cache; the chain stays authoritative.
pub trait PendingStore: Send + Sync {
    /// Load the saved set. A sender with nothing saved yields an empty list.
    fn load(&self, sender: &Address) -> TrackerResult<Vec<PendingTransfer>>;

    /// Replace the saved set.
    fn save(&self, sender: &Address, transfers: &[PendingTransfer]) -> TrackerResult<()>;
}
