//! # Error Types
//!
//! Errors shared across subsystems.

use thiserror::Error;

/// Errors from the blockchain client capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    /// The endpoint could not be reached or the HTTP exchange failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The node answered with something we could not decode.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The transfer could not be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The transfer was included but its execution reverted.
    #[error("Transfer {0} reverted")]
    Reverted(String),

    /// Waiting for confirmation exceeded the client's bound.
    #[error("Timed out waiting for {0} to confirm")]
    Timeout(String),
}

impl ChainError {
    /// True for the node's "already known" rejection of a duplicate broadcast.
    pub fn is_already_known(&self) -> bool {
        match self {
            Self::Rpc { message, .. } => message.to_lowercase().contains("already known"),
            _ => false,
        }
    }
}

/// Errors converting decimal strings to base units.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("too many decimal places (max {max}, found {found})")]
    TooManyDecimals { max: u8, found: usize },

    #[error("value out of range")]
    Overflow,
}
