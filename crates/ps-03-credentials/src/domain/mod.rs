//! Credential domain: records, the book that orders them, and acceptance rules.

pub mod book;
pub mod record;
pub mod rules;

pub use book::CredentialBook;
pub use record::{CredentialRecord, SavedCredential};
pub use rules::validate_endpoint_url;
