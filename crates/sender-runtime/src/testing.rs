//! Test doubles for the runtime ports.
//!
//! Shared with the end-to-end tests.

use crate::adapters::ChainFactory;
use parking_lot::Mutex;
use shared_types::{to_checksum, Address, ChainClient, ChainError, ScriptedChain, SigningSecret};
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out pre-registered scripted chains by sender address.
#[derive(Default)]
pub struct StaticChainFactory {
    chains: Mutex<HashMap<Address, Arc<ScriptedChain>>>,
    endpoints: Mutex<Vec<String>>,
}

impl StaticChainFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, chain: Arc<ScriptedChain>) {
        self.chains.lock().insert(chain.sender(), chain);
    }

    /// Endpoints passed to `connect`, in order.
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().clone()
    }
}

impl ChainFactory for StaticChainFactory {
    fn connect(
        &self,
        endpoint: &str,
        key: &SigningSecret,
    ) -> Result<Arc<dyn ChainClient>, ChainError> {
        self.endpoints.lock().push(endpoint.to_string());
        let sender = key.address();
        let chain: Arc<dyn ChainClient> = self
            .chains
            .lock()
            .get(&sender)
            .cloned()
            .ok_or_else(|| ChainError::Transport(format!("no chain for {}", to_checksum(&sender))))?;
        Ok(chain)
    }
}
