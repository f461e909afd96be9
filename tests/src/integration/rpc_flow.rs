//! # JSON-RPC Flow
//!
//! The full stack with real EIP-155 signing: the chain factory hands out
//! `EthRpcClient`s whose transport is an in-process fake node.

use async_trait::async_trait;
use parking_lot::Mutex;
use ps_04_eth_rpc::{ChainConfig, EthRpcClient, RpcTransport};
use sender_runtime::adapters::ChainFactory;
use serde_json::{json, Value};
use shared_types::{keccak256, ChainClient, ChainError, SigningSecret, U256};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct NodeState {
    confirmed: u64,
    pending: u64,
    gas_price: U256,
    block: u64,
    raw: Vec<String>,
    receipts: HashMap<String, Value>,
    auto_mine: bool,
    calls: Vec<String>,
}

/// Minimal node: counts nonces, hashes raw transactions and mines on request.
#[derive(Clone, Default)]
pub struct FakeNode {
    state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    pub fn new(gas_price: U256) -> Self {
        let node = Self::default();
        node.state.lock().gas_price = gas_price;
        node
    }

    /// Include every unmined transaction with the given receipt status.
    pub fn mine(&self, success: bool) {
        let mut state = self.state.lock();
        state.block += 1;
        let block = state.block;
        let hashes: Vec<String> = state.raw.iter().map(|raw| hash_of(raw)).collect();
        for hash in hashes {
            state
                .receipts
                .entry(hash.clone())
                .or_insert_with(|| receipt(&hash, block, success));
        }
        state.confirmed = state.pending;
    }

    pub fn auto_mine(&self) {
        self.state.lock().auto_mine = true;
    }

    pub fn set_gas_price(&self, gas_price: U256) {
        self.state.lock().gas_price = gas_price;
    }

    pub fn raw_transactions(&self) -> Vec<String> {
        self.state.lock().raw.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }
}

fn hash_of(raw: &str) -> String {
    let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
    format!("0x{}", hex::encode(keccak256(&bytes)))
}

fn receipt(hash: &str, block: u64, success: bool) -> Value {
    json!({
        "transactionHash": hash,
        "blockNumber": format!("0x{:x}", block),
        "status": if success { "0x1" } else { "0x0" },
    })
}

#[async_trait]
impl RpcTransport for FakeNode {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let mut state = self.state.lock();
        state.calls.push(method.to_string());
        match method {
            "eth_getTransactionCount" => {
                let count = match params[1].as_str() {
                    Some("pending") => state.pending,
                    _ => state.confirmed,
                };
                Ok(json!(format!("0x{:x}", count)))
            }
            "eth_gasPrice" => Ok(json!(format!("0x{:x}", state.gas_price))),
            "eth_blockNumber" => Ok(json!(format!("0x{:x}", state.block))),
            "eth_sendRawTransaction" => {
                let raw = params[0].as_str().unwrap_or_default().to_string();
                let hash = hash_of(&raw);
                state.raw.push(raw);
                state.pending += 1;
                if state.auto_mine {
                    state.block += 1;
                    let block = state.block;
                    state.receipts.insert(hash.clone(), receipt(&hash, block, true));
                    state.confirmed = state.pending;
                }
                Ok(json!(hash))
            }
            "eth_getTransactionReceipt" => {
                let hash = params[0].as_str().unwrap_or_default();
                Ok(state.receipts.get(hash).cloned().unwrap_or(Value::Null))
            }
            other => Err(ChainError::Rpc {
                code: -32601,
                message: format!("the method {} does not exist", other),
            }),
        }
    }
}

/// Every connect talks to the same fake node.
pub struct FakeNodeFactory {
    node: FakeNode,
    config: ChainConfig,
}

impl FakeNodeFactory {
    pub fn new(node: FakeNode) -> Self {
        let config = ChainConfig {
            receipt_poll_interval_ms: 1,
            confirmation_timeout_secs: 5,
            ..ChainConfig::default()
        };
        Self { node, config }
    }
}

impl ChainFactory for FakeNodeFactory {
    fn connect(
        &self,
        _endpoint: &str,
        key: &SigningSecret,
    ) -> Result<Arc<dyn ChainClient>, ChainError> {
        let client: Arc<dyn ChainClient> = Arc::new(EthRpcClient::with_transport(
            self.node.clone(),
            key,
            self.config.clone(),
        )?);
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::support::*;
    use ps_01_conversation::SessionState;
    use ps_02_pending_tracker::{InMemoryPendingStore, PendingTrackerApi};
    use ps_03_credentials::InMemoryVault;

    fn gwei(n: u64) -> U256 {
        U256::from(n) * U256::from(GWEI)
    }

    fn operator(node: &FakeNode) -> Operator {
        Operator::new(
            Arc::new(FakeNodeFactory::new(node.clone())),
            Arc::new(InMemoryVault::new()),
            Arc::new(InMemoryPendingStore::new()),
        )
    }

    #[tokio::test]
    async fn test_signed_transfer_tracked_by_node_hash() {
        let node = FakeNode::new(gwei(1));
        let op = operator(&node);

        assert_eq!(
            op.send_transfer("USDC", "12.5", "2").await,
            Ok(SessionState::Completed)
        );

        let raw = node.raw_transactions();
        assert_eq!(raw.len(), 1);
        let tracker = op.container.trackers.get(&op.me).unwrap();
        let pending = tracker.pending();
        assert_eq!(format!("{:?}", pending[0].transfer_id), hash_of(&raw[0]));

        let calls = node.calls();
        assert!(calls.iter().any(|c| c == "eth_getTransactionCount"));
        assert!(calls.iter().any(|c| c == "eth_sendRawTransaction"));
    }

    #[tokio::test]
    async fn test_mined_transfer_reconciled() {
        let node = FakeNode::new(gwei(1));
        let op = operator(&node);
        op.send_transfer("USDC", "1", "2").await.unwrap();

        assert_eq!(op.reconciler().tick().await, 0);
        node.mine(true);
        assert_eq!(op.reconciler().tick().await, 1);
        assert!(op.sink.last_text().contains("#0 (USDC) confirmed"));
    }

    #[tokio::test]
    async fn test_cancel_over_rpc() {
        let node = FakeNode::new(gwei(1));
        let op = operator(&node);
        op.send_transfer("USDT", "3", "1.5").await.unwrap();

        node.set_gas_price(gwei(2));
        node.auto_mine();
        finish(op.text("/cancel_pending").await).await;

        assert_eq!(node.raw_transactions().len(), 2);
        let text = op.sink.last_text();
        assert!(text.contains("Pending transaction #0 cancelled"));
        assert!(text.contains("Gas Price: 4 Gwei"));
        assert!(op.container.trackers.get(&op.me).unwrap().pending().is_empty());
    }
}
