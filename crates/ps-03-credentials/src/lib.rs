//! # ps-03-credentials
//!
//! Remembers endpoints and signing keys between conversations so a user can
//! pick a saved one instead of typing it again.
//!
//! ## Overview
//!
//! - **Store**: a secret is validated, encoded and saved with a nickname.
//!   Saving a value that is already present refreshes its nickname and
//!   last-used time instead of creating a second entry.
//! - **List**: saved entries of one kind, most recently used first. Listing
//!   never exposes the secret itself.
//! - **Reveal**: decodes one entry and marks it as used.
//! - **Forget**: removes one entry.
//!
//! Values are base64 encoded at rest. This is obfuscation, not encryption.
//!
//! ## Module Structure
//!
//! ```text
//! domain/record.rs    - CredentialRecord, SavedCredential
//! domain/book.rs      - CredentialBook (dedupe, MRU ordering)
//! domain/rules.rs     - endpoint URL acceptance
//! ports/outbound.rs   - CredentialVault
//! adapters/           - in-memory and JSON file vaults
//! service.rs          - CredentialAdapter
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryVault, JsonFileVault};
pub use domain::{validate_endpoint_url, CredentialBook, CredentialRecord, SavedCredential};
pub use error::{CredentialError, CredentialResult};
pub use ports::outbound::CredentialVault;
pub use service::CredentialAdapter;
