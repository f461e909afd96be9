//! Outbound port: where saved credentials live.

use crate::domain::{CredentialRecord, SavedCredential};
use crate::error::CredentialResult;
use shared_types::{Address, CredentialKind, Timestamp};
use uuid::Uuid;

/// Credential storage.
///
/// Implementations dedupe by (kind, secret) and list most recently used
/// first.
pub trait CredentialVault: Send + Sync {
    fn store(
        &self,
        secret: &str,
        kind: CredentialKind,
        nickname: &str,
        address: Option<Address>,
        now: Timestamp,
    ) -> CredentialResult<CredentialRecord>;

    fn list(&self, kind: CredentialKind) -> CredentialResult<Vec<SavedCredential>>;

    fn reveal(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<String>;

    /// Mark an entry as just used.
    fn touch(&self, id: &Uuid, now: Timestamp) -> CredentialResult<()>;

    fn forget(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<()>;
}
