//! Saved credential records.

use crate::error::{CredentialError, CredentialResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use shared_types::{to_checksum, Address, CredentialKind, Timestamp};
use std::fmt;
use uuid::Uuid;

/// A stored credential. `value` holds the base64 encoded secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub nickname: String,
    pub kind: CredentialKind,
    value: String,
    pub last_used: Timestamp,
    /// Derived sender address, signing keys only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl CredentialRecord {
    pub fn new(
        secret: &str,
        kind: CredentialKind,
        nickname: impl Into<String>,
        address: Option<Address>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            kind,
            value: STANDARD.encode(secret.as_bytes()),
            last_used: now,
            address,
        }
    }

    /// Decodes the stored secret.
    pub fn reveal(&self) -> CredentialResult<String> {
        let bytes = STANDARD
            .decode(self.value.as_bytes())
            .map_err(|e| CredentialError::Decode {
                reason: e.to_string(),
            })?;
        String::from_utf8(bytes).map_err(|e| CredentialError::Decode {
            reason: e.to_string(),
        })
    }

    /// True when this record holds exactly `secret`.
    pub fn holds(&self, secret: &str) -> bool {
        self.reveal().map(|v| v == secret).unwrap_or(false)
    }

    /// Listing view without the secret.
    pub fn summary(&self) -> SavedCredential {
        SavedCredential {
            id: self.id,
            nickname: self.nickname.clone(),
            kind: self.kind,
            last_used: self.last_used,
            address: self.address,
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("kind", &self.kind)
            .field("value", &"<redacted>")
            .field("last_used", &self.last_used)
            .field("address", &self.address)
            .finish()
    }
}

/// A saved credential as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCredential {
    pub id: Uuid,
    pub nickname: String,
    pub kind: CredentialKind,
    pub last_used: Timestamp,
    pub address: Option<Address>,
}

impl SavedCredential {
    /// Menu label: the nickname, plus the address for signing keys.
    pub fn label(&self) -> String {
        match self.address {
            Some(address) => format!("{} ({})", self.nickname, to_checksum(&address)),
            None => self.nickname.clone(),
        }
    }
}
