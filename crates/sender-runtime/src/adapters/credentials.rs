//! `CredentialSource` over the credential vault.

use ps_01_conversation::{CredentialSource, MenuOption};
use ps_03_credentials::CredentialAdapter;
use shared_types::CredentialKind;
use std::sync::Arc;
use tracing::warn;

pub struct VaultCredentialSource {
    vault: Arc<CredentialAdapter>,
}

impl VaultCredentialSource {
    pub fn new(vault: Arc<CredentialAdapter>) -> Self {
        Self { vault }
    }
}

impl CredentialSource for VaultCredentialSource {
    fn saved(&self, kind: CredentialKind) -> Vec<MenuOption> {
        let icon = match kind {
            CredentialKind::Endpoint => "🌐",
            CredentialKind::SigningKey => "🔑",
        };
        self.vault
            .saved(kind)
            .iter()
            .map(|saved| {
                MenuOption::new(
                    format!("{} {}", icon, saved.label()),
                    format!("cred:{}", saved.id),
                )
            })
            .collect()
    }

    fn reveal(&self, id: &str, kind: CredentialKind) -> Option<String> {
        match self.vault.reveal(id, kind) {
            Ok(secret) => Some(secret),
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "Saved credential unavailable");
                None
            }
        }
    }
}
