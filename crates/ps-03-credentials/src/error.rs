//! Error types for the credential vault.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    #[error("Invalid signing key")]
    InvalidKey,

    #[error("Credential not found: {id}")]
    NotFound { id: String },

    #[error("Credential storage failed: {reason}")]
    Storage { reason: String },

    #[error("Stored credential could not be decoded: {reason}")]
    Decode { reason: String },
}

pub type CredentialResult<T> = Result<T, CredentialError>;
