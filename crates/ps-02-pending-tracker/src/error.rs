//! Error types for the pending-transfer tracker

use shared_types::{ChainError, TxHash};
use thiserror::Error;

/// Tracker errors
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The sequence number is already held by another tracked transfer
    #[error("Sequence {sequence} is already tracked by {existing:?}")]
    DuplicateSequence { sequence: u64, existing: TxHash },

    /// A transfer was recorded below the highest tracked sequence number
    #[error("Sequence {sequence} is below the highest tracked sequence {highest}")]
    SequenceOutOfOrder { sequence: u64, highest: u64 },

    /// Nothing to cancel
    #[error("No pending transfer to cancel")]
    NoPendingTransfer,

    /// Only one cancellation may run per tracker
    #[error("A cancellation is already in progress")]
    CancellationInProgress,

    /// The replacement could not be submitted or did not confirm
    #[error("Cancellation of sequence {sequence} failed: {cause}")]
    CancellationFailure { sequence: u64, cause: String },

    /// Chain read failed during reconciliation
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// Pending-set storage failed
    #[error("Persistence error: {reason}")]
    Persistence { reason: String },
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
