//! Chain client construction from collected credentials.

use ps_04_eth_rpc::{ChainConfig, EthRpcClient};
use shared_types::{redact_endpoint, ChainClient, ChainError, SigningSecret};
use std::sync::Arc;
use tracing::debug;

/// Builds a `ChainClient` bound to one endpoint and signing key.
pub trait ChainFactory: Send + Sync {
    fn connect(
        &self,
        endpoint: &str,
        key: &SigningSecret,
    ) -> Result<Arc<dyn ChainClient>, ChainError>;
}

/// JSON-RPC clients over HTTP.
#[derive(Debug, Clone)]
pub struct RpcChainFactory {
    config: ChainConfig,
}

impl RpcChainFactory {
    pub fn new(config: ChainConfig) -> Self {
        Self { config }
    }
}

impl ChainFactory for RpcChainFactory {
    fn connect(
        &self,
        endpoint: &str,
        key: &SigningSecret,
    ) -> Result<Arc<dyn ChainClient>, ChainError> {
        debug!(endpoint = %redact_endpoint(endpoint), "Connecting chain client");
        let client: Arc<dyn ChainClient> =
            Arc::new(EthRpcClient::connect(endpoint, key, self.config.clone())?);
        Ok(client)
    }
}
