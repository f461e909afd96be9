//! In-memory vault for tests and ephemeral runs.

use crate::domain::{CredentialBook, CredentialRecord, SavedCredential};
use crate::error::CredentialResult;
use crate::ports::outbound::CredentialVault;
use parking_lot::RwLock;
use shared_types::{Address, CredentialKind, Timestamp};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryVault {
    book: RwLock<CredentialBook>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.book.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.book.read().is_empty()
    }
}

impl CredentialVault for InMemoryVault {
    fn store(
        &self,
        secret: &str,
        kind: CredentialKind,
        nickname: &str,
        address: Option<Address>,
        now: Timestamp,
    ) -> CredentialResult<CredentialRecord> {
        Ok(self.book.write().store(secret, kind, nickname, address, now))
    }

    fn list(&self, kind: CredentialKind) -> CredentialResult<Vec<SavedCredential>> {
        Ok(self.book.read().list(kind))
    }

    fn reveal(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<String> {
        self.book.read().reveal(id, kind)
    }

    fn touch(&self, id: &Uuid, now: Timestamp) -> CredentialResult<()> {
        self.book.write().touch(id, now)
    }

    fn forget(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<()> {
        self.book.write().forget(id, kind).map(|_| ())
    }
}
