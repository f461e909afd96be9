//! # Core Domain Entities
//!
//! Chain-level primitives shared by all subsystems.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 20-byte account address.
pub type Address = primitive_types::H160;

/// A 32-byte chain-assigned transfer identifier (transaction hash).
pub type TxHash = primitive_types::H256;

/// Milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Opaque key for "who is talking" on the messaging channel.
///
/// For a chat transport this is the chat id; the console channel uses a
/// fixed operator identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity(pub String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for Identity {
    fn from(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }
}

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Render an address with its EIP-55 mixed-case checksum.
pub fn to_checksum(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse an address string the way wallets do.
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// forms are accepted as-is; mixed case must match the EIP-55 checksum.
pub fn parse_address(text: &str) -> Option<Address> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let bytes = hex::decode(digits).ok()?;
    let address = Address::from_slice(&bytes);

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address)[2..] != *digits {
        return None;
    }

    Some(address)
}

/// Short human form of a hash for log lines and chat messages.
pub fn short_hash(hash: &TxHash) -> String {
    let full = format!("{:?}", hash);
    format!("{}…{}", &full[..10], &full[full.len() - 6..])
}
