//! # Credential Book
//!
//! The in-memory collection behind every vault adapter. One entry per
//! (kind, secret) pair; saving a known secret refreshes the existing entry.

use super::record::{CredentialRecord, SavedCredential};
use crate::error::{CredentialError, CredentialResult};
use shared_types::{Address, CredentialKind, Timestamp};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialBook {
    records: Vec<CredentialRecord>,
}

impl CredentialBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Save `secret`, or refresh the entry that already holds it.
    pub fn store(
        &mut self,
        secret: &str,
        kind: CredentialKind,
        nickname: &str,
        address: Option<Address>,
        now: Timestamp,
    ) -> CredentialRecord {
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| r.kind == kind && r.holds(secret))
        {
            existing.nickname = nickname.to_string();
            existing.last_used = now;
            if address.is_some() {
                existing.address = address;
            }
            return existing.clone();
        }

        let record = CredentialRecord::new(secret, kind, nickname, address, now);
        self.records.push(record.clone());
        record
    }

    /// Entries of `kind`, most recently used first.
    pub fn list(&self, kind: CredentialKind) -> Vec<SavedCredential> {
        let mut saved: Vec<SavedCredential> = self
            .records
            .iter()
            .filter(|r| r.kind == kind)
            .map(CredentialRecord::summary)
            .collect();
        saved.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        saved
    }

    pub fn reveal(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<String> {
        self.find(id, kind)?.reveal()
    }

    pub fn touch(&mut self, id: &Uuid, now: Timestamp) -> CredentialResult<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        record.last_used = now;
        Ok(())
    }

    pub fn forget(&mut self, id: &Uuid, kind: CredentialKind) -> CredentialResult<CredentialRecord> {
        let index = self
            .records
            .iter()
            .position(|r| &r.id == id && r.kind == kind)
            .ok_or_else(|| not_found(id))?;
        Ok(self.records.remove(index))
    }

    fn find(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<&CredentialRecord> {
        self.records
            .iter()
            .find(|r| &r.id == id && r.kind == kind)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &Uuid) -> CredentialError {
    CredentialError::NotFound { id: id.to_string() }
}
