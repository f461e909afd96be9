//! HTTP JSON-RPC transport over reqwest.

use crate::metrics;
use crate::ports::outbound::RpcTransport;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{redact_endpoint, ChainError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
    request_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChainError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &redact_endpoint(&self.endpoint))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };

        let started = Instant::now();
        let result = async {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    // reqwest errors can embed the URL, which carries the project id.
                    ChainError::Transport(e.without_url().to_string())
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ChainError::Transport(format!("HTTP {}", status)));
            }

            let body: JsonRpcResponse = response
                .json()
                .await
                .map_err(|e| ChainError::Decode(e.without_url().to_string()))?;

            if let Some(error) = body.error {
                return Err(ChainError::Rpc {
                    code: error.code,
                    message: error.message,
                });
            }
            Ok(body.result.unwrap_or(Value::Null))
        }
        .await;

        metrics::record_request(method, result.is_ok(), started.elapsed());
        debug!(method, ok = result.is_ok(), "JSON-RPC call");
        result
    }
}
