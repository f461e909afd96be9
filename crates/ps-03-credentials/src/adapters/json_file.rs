//! # JSON File Vault
//!
//! All credentials in one file (`credentials.json` under the data dir).
//! Every mutation rewrites the file through a temporary sibling and a
//! rename; the in-memory book only changes once the write succeeded.

use crate::domain::{CredentialBook, CredentialRecord, SavedCredential};
use crate::error::{CredentialError, CredentialResult};
use crate::ports::outbound::CredentialVault;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_types::{Address, CredentialKind, Timestamp};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// On-disk format version.
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct PersistedVault {
    version: u32,
    credentials: Vec<CredentialRecord>,
}

#[derive(Debug)]
pub struct JsonFileVault {
    path: PathBuf,
    book: RwLock<CredentialBook>,
}

fn storage(err: impl std::fmt::Display) -> CredentialError {
    CredentialError::Storage {
        reason: err.to_string(),
    }
}

impl JsonFileVault {
    /// Opens the vault at `path`. A missing file is an empty vault.
    pub fn open(path: impl Into<PathBuf>) -> CredentialResult<Self> {
        let path = path.into();
        let book = match fs::read(&path) {
            Ok(bytes) => {
                let persisted: PersistedVault = serde_json::from_slice(&bytes).map_err(storage)?;
                if persisted.version != FORMAT_VERSION {
                    return Err(storage(format!(
                        "unsupported format version {}",
                        persisted.version
                    )));
                }
                CredentialBook::from_records(persisted.credentials)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => CredentialBook::new(),
            Err(e) => return Err(storage(e)),
        };
        debug!(path = %path.display(), entries = book.len(), "Credential vault opened");

        Ok(Self {
            path,
            book: RwLock::new(book),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, book: &CredentialBook) -> CredentialResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(storage)?;
        }
        let persisted = PersistedVault {
            version: FORMAT_VERSION,
            credentials: book.records().to_vec(),
        };
        let json = serde_json::to_vec_pretty(&persisted).map_err(storage)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(storage)?;
        fs::rename(&tmp, &self.path).map_err(storage)
    }

    /// Applies `change` to a copy of the book, persists it, then swaps it in.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut CredentialBook) -> CredentialResult<T>,
    ) -> CredentialResult<T> {
        let mut book = self.book.write();
        let mut next = book.clone();
        let out = change(&mut next)?;
        self.write(&next)?;
        *book = next;
        Ok(out)
    }
}

impl CredentialVault for JsonFileVault {
    fn store(
        &self,
        secret: &str,
        kind: CredentialKind,
        nickname: &str,
        address: Option<Address>,
        now: Timestamp,
    ) -> CredentialResult<CredentialRecord> {
        self.mutate(|book| Ok(book.store(secret, kind, nickname, address, now)))
    }

    fn list(&self, kind: CredentialKind) -> CredentialResult<Vec<SavedCredential>> {
        Ok(self.book.read().list(kind))
    }

    fn reveal(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<String> {
        self.book.read().reveal(id, kind)
    }

    fn touch(&self, id: &Uuid, now: Timestamp) -> CredentialResult<()> {
        self.mutate(|book| book.touch(id, now))
    }

    fn forget(&self, id: &Uuid, kind: CredentialKind) -> CredentialResult<()> {
        self.mutate(|book| book.forget(id, kind).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://mainnet.infura.io/v3/0123";

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vault = JsonFileVault::open(dir.path().join("credentials.json")).unwrap();
        assert!(vault.list(CredentialKind::Endpoint).unwrap().is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("credentials.json");

        let stored = {
            let vault = JsonFileVault::open(&path).unwrap();
            vault
                .store(ENDPOINT, CredentialKind::Endpoint, "main", None, 7)
                .unwrap()
        };

        let vault = JsonFileVault::open(&path).unwrap();
        let listed = vault.list(CredentialKind::Endpoint).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);
        assert_eq!(vault.reveal(&stored.id, CredentialKind::Endpoint).unwrap(), ENDPOINT);
    }

    #[test]
    fn test_file_does_not_contain_plain_secret() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let vault = JsonFileVault::open(&path).unwrap();
        vault
            .store(ENDPOINT, CredentialKind::Endpoint, "main", None, 7)
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains(ENDPOINT));
    }

    #[test]
    fn test_forget_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let vault = JsonFileVault::open(&path).unwrap();
        let record = vault
            .store(ENDPOINT, CredentialKind::Endpoint, "main", None, 7)
            .unwrap();
        vault.forget(&record.id, CredentialKind::Endpoint).unwrap();

        let reopened = JsonFileVault::open(&path).unwrap();
        assert!(reopened.list(CredentialKind::Endpoint).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"[oops").unwrap();

        assert!(matches!(
            JsonFileVault::open(&path),
            Err(CredentialError::Storage { .. })
        ));
    }
}
