//! # Credential Adapter
//!
//! The thin layer the rest of the system talks to. It checks what is worth
//! saving, picks default nicknames, and marks entries as used when they are
//! revealed. Vault failures are logged and surface as "nothing saved"
//! where a caller can carry on without the vault.

use crate::domain::{validate_endpoint_url, SavedCredential};
use crate::error::{CredentialError, CredentialResult};
use crate::metrics;
use crate::ports::outbound::CredentialVault;
use shared_types::{redact_endpoint, to_checksum, CredentialKind, SigningSecret, TimeSource};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct CredentialAdapter {
    vault: Arc<dyn CredentialVault>,
    clock: Arc<dyn TimeSource>,
}

impl CredentialAdapter {
    pub fn new(vault: Arc<dyn CredentialVault>, clock: Arc<dyn TimeSource>) -> Self {
        Self { vault, clock }
    }

    /// Save an endpoint. Defaults the nickname to the redacted URL.
    pub fn remember_endpoint(
        &self,
        url: &str,
        nickname: Option<&str>,
    ) -> CredentialResult<SavedCredential> {
        let url = url.trim();
        validate_endpoint_url(url)?;
        let nickname = nickname
            .map(str::to_string)
            .unwrap_or_else(|| redact_endpoint(url));

        let result = self
            .vault
            .store(url, CredentialKind::Endpoint, &nickname, None, self.clock.now());
        metrics::record_operation("store", result.is_ok());
        let record = result?;
        debug!(id = %record.id, "Endpoint remembered");
        Ok(record.summary())
    }

    /// Save a signing key together with its derived address.
    pub fn remember_key(
        &self,
        key: &str,
        nickname: Option<&str>,
    ) -> CredentialResult<SavedCredential> {
        let secret = SigningSecret::parse(key).ok_or(CredentialError::InvalidKey)?;
        let address = secret.address();
        let nickname = nickname.map(str::to_string).unwrap_or_else(|| {
            let checksum = to_checksum(&address);
            format!("Wallet {}", &checksum[checksum.len() - 4..])
        });

        let result = self.vault.store(
            &secret.expose(),
            CredentialKind::SigningKey,
            &nickname,
            Some(address),
            self.clock.now(),
        );
        metrics::record_operation("store", result.is_ok());
        let record = result?;
        debug!(id = %record.id, address = %to_checksum(&address), "Signing key remembered");
        Ok(record.summary())
    }

    /// Saved entries of `kind`, most recently used first.
    pub fn saved(&self, kind: CredentialKind) -> Vec<SavedCredential> {
        match self.vault.list(kind) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "Listing saved credentials failed");
                Vec::new()
            }
        }
    }

    /// Decode a saved entry and mark it as used.
    pub fn reveal(&self, id: &str, kind: CredentialKind) -> CredentialResult<String> {
        let id = parse_id(id)?;
        let result = self.vault.reveal(&id, kind);
        metrics::record_operation("reveal", result.is_ok());
        let secret = result?;

        if let Err(e) = self.vault.touch(&id, self.clock.now()) {
            warn!(%id, error = %e, "Could not update credential usage time");
        }
        Ok(secret)
    }

    pub fn forget(&self, id: &str, kind: CredentialKind) -> CredentialResult<()> {
        let id = parse_id(id)?;
        let result = self.vault.forget(&id, kind);
        metrics::record_operation("forget", result.is_ok());
        result
    }
}

fn parse_id(id: &str) -> CredentialResult<Uuid> {
    Uuid::parse_str(id.trim()).map_err(|_| CredentialError::NotFound { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryVault;
    use shared_types::ManualTimeSource;

    const ENDPOINT: &str = "https://mainnet.infura.io/v3/0123456789abcdef";
    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    fn adapter() -> (CredentialAdapter, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(1_000));
        let adapter = CredentialAdapter::new(Arc::new(InMemoryVault::new()), clock.clone());
        (adapter, clock)
    }

    #[test]
    fn test_endpoint_is_validated() {
        let (adapter, _) = adapter();
        assert!(matches!(
            adapter.remember_endpoint("http://mainnet.infura.io/v3/abc", None),
            Err(CredentialError::InvalidEndpoint { .. })
        ));
        assert!(adapter.saved(CredentialKind::Endpoint).is_empty());
    }

    #[test]
    fn test_endpoint_default_nickname_is_redacted() {
        let (adapter, _) = adapter();
        let saved = adapter.remember_endpoint(ENDPOINT, None).unwrap();
        assert_eq!(saved.nickname, redact_endpoint(ENDPOINT));
        assert!(!saved.nickname.contains("0123456789abcdef"));
    }

    #[test]
    fn test_key_carries_derived_address() {
        let (adapter, _) = adapter();
        let saved = adapter.remember_key(KEY_ONE, Some("main")).unwrap();
        assert_eq!(
            to_checksum(&saved.address.unwrap()),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
        assert_eq!(saved.nickname, "main");
    }

    #[test]
    fn test_key_default_nickname_uses_address_tail() {
        let (adapter, _) = adapter();
        let saved = adapter.remember_key(KEY_ONE, None).unwrap();
        assert_eq!(saved.nickname, "Wallet 5Bdf");
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let (adapter, _) = adapter();
        assert_eq!(
            adapter.remember_key("0x1234", None),
            Err(CredentialError::InvalidKey)
        );
    }

    #[test]
    fn test_key_with_and_without_prefix_is_one_entry() {
        let (adapter, _) = adapter();
        let a = adapter.remember_key(KEY_ONE, None).unwrap();
        let b = adapter.remember_key(&format!("0x{}", KEY_ONE), None).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(adapter.saved(CredentialKind::SigningKey).len(), 1);
    }

    #[test]
    fn test_reveal_touches_entry() {
        let (adapter, clock) = adapter();
        let first = adapter.remember_endpoint(ENDPOINT, None).unwrap();
        clock.advance(10);
        let second = adapter
            .remember_endpoint("https://mainnet.infura.io/v3/ffff", None)
            .unwrap();
        assert_eq!(adapter.saved(CredentialKind::Endpoint)[0].id, second.id);

        clock.advance(10);
        let secret = adapter
            .reveal(&first.id.to_string(), CredentialKind::Endpoint)
            .unwrap();
        assert_eq!(secret, ENDPOINT);
        assert_eq!(adapter.saved(CredentialKind::Endpoint)[0].id, first.id);
    }

    #[test]
    fn test_revealed_key_is_normalized() {
        let (adapter, _) = adapter();
        let saved = adapter.remember_key(KEY_ONE, None).unwrap();
        let secret = adapter
            .reveal(&saved.id.to_string(), CredentialKind::SigningKey)
            .unwrap();
        assert_eq!(secret, format!("0x{}", KEY_ONE));
    }

    #[test]
    fn test_unknown_or_malformed_id() {
        let (adapter, _) = adapter();
        assert!(matches!(
            adapter.reveal("not-a-uuid", CredentialKind::Endpoint),
            Err(CredentialError::NotFound { .. })
        ));
        assert!(matches!(
            adapter.reveal(&Uuid::new_v4().to_string(), CredentialKind::Endpoint),
            Err(CredentialError::NotFound { .. })
        ));
    }

    #[test]
    fn test_forget() {
        let (adapter, _) = adapter();
        let saved = adapter.remember_endpoint(ENDPOINT, None).unwrap();
        adapter
            .forget(&saved.id.to_string(), CredentialKind::Endpoint)
            .unwrap();
        assert!(adapter.saved(CredentialKind::Endpoint).is_empty());
    }
}
