//! Error types for the conversation subsystem

use crate::domain::SessionState;
use thiserror::Error;

/// Rejected field input. The session stays where it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid endpoint URL. Expected format: {expected_prefix}<project-id>")]
    InvalidEndpoint { expected_prefix: String },

    #[error("Invalid private key format")]
    InvalidKey,

    #[error("Unknown token '{0}'. Please select one from the list")]
    UnknownAsset(String),

    #[error("Invalid Ethereum address")]
    InvalidAddress,

    #[error("Invalid amount, enter a positive number")]
    InvalidAmount,

    #[error("Too many decimal places (at most {max})")]
    TooManyDecimals { max: u8 },

    #[error("Gas price must be at least {floor} Gwei")]
    FeeBelowFloor { floor: String },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("Unknown saved credential")]
    UnknownCredential,

    #[error("Please type the value instead of choosing an option")]
    UnexpectedSelection,
}

/// Conversation errors. Every variant has already been reported to the
/// operator by the time it is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session expired")]
    SessionExpired,

    #[error("Broadcast failed: {cause}")]
    BroadcastFailure { cause: String },

    #[error("No active session")]
    NoSession,

    #[error("Input not expected in state {state}")]
    UnexpectedInput { state: SessionState },
}

/// Failure reported by a `TransferBroadcaster`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct BroadcastError(pub String);

/// Result type for conversation operations
pub type ConversationResult<T> = Result<T, ConversationError>;
