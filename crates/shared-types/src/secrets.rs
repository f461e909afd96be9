//! Operator-supplied secrets.
//!
//! Secret material never appears in `Debug` output or log lines.

use crate::entities::{keccak256, Address};
use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of secret a credential holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKind {
    /// RPC endpoint URL (its path carries the provider project id).
    Endpoint,
    /// secp256k1 signing key.
    SigningKey,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Endpoint => "endpoint",
            Self::SigningKey => "signing_key",
        }
    }
}

/// A validated secp256k1 signing key and its account address.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret {
    hex: String,
    address: Address,
}

impl SigningSecret {
    /// Parse 64 hex digits, with or without `0x`, that form a valid scalar.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text.strip_prefix("0x").unwrap_or(text);
        if digits.len() != 64 {
            return None;
        }
        let bytes = hex::decode(digits).ok()?;
        let key = SigningKey::from_slice(&bytes).ok()?;

        Some(Self {
            hex: digits.to_ascii_lowercase(),
            address: address_from_pubkey(key.verifying_key()),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The key as `0x`-prefixed lowercase hex.
    pub fn expose(&self) -> String {
        format!("0x{}", self.hex)
    }

    pub fn to_signing_key(&self) -> Option<SigningKey> {
        let bytes = hex::decode(&self.hex).ok()?;
        SigningKey::from_slice(&bytes).ok()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Account address of a public key: last 20 bytes of keccak256 over the
/// uncompressed point without its prefix byte.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Endpoint URL with the project id shortened, for logs and nicknames.
pub fn redact_endpoint(url: &str) -> String {
    match url.rsplit_once('/') {
        Some((base, id)) if id.chars().count() > 4 => {
            format!("{}/{}…", base, id.chars().take(4).collect::<String>())
        }
        Some((base, _)) => format!("{}/…", base),
        None => "…".to_string(),
    }
}
