//! Outbound port: a JSON-RPC request/response channel.

use async_trait::async_trait;
use serde_json::Value;
use shared_types::ChainError;

#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Calls `method` and returns the `result` member of the response.
    ///
    /// A JSON-RPC `error` member is returned as `ChainError::Rpc`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError>;
}
