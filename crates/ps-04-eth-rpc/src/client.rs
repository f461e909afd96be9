//! # Ethereum JSON-RPC Client
//!
//! Implements `ChainClient` for one signing account. Signing happens
//! locally; the endpoint only ever sees raw signed transactions.

use crate::adapters::HttpTransport;
use crate::config::ChainConfig;
use crate::domain::{parse_quantity, parse_quantity_u64, LegacyTransaction};
use crate::ports::outbound::RpcTransport;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use serde_json::{json, Value};
use shared_types::{
    short_hash, to_checksum, Address, ChainClient, ChainError, Receipt, ReceiptStatus,
    SequenceMode, SigningSecret, TransferRequest, TxHash, U256,
};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

pub struct EthRpcClient<T: RpcTransport = HttpTransport> {
    transport: T,
    key: SigningKey,
    sender: Address,
    config: ChainConfig,
}

impl EthRpcClient<HttpTransport> {
    /// Client for `endpoint` over HTTP.
    pub fn connect(
        endpoint: &str,
        secret: &SigningSecret,
        config: ChainConfig,
    ) -> Result<Self, ChainError> {
        let transport = HttpTransport::new(endpoint, config.request_timeout())?;
        Self::with_transport(transport, secret, config)
    }
}

impl<T: RpcTransport> EthRpcClient<T> {
    pub fn with_transport(
        transport: T,
        secret: &SigningSecret,
        config: ChainConfig,
    ) -> Result<Self, ChainError> {
        let key = secret
            .to_signing_key()
            .ok_or_else(|| ChainError::Signing("invalid signing key".into()))?;
        Ok(Self {
            transport,
            key,
            sender: secret.address(),
            config,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    async fn call_quantity(&self, method: &str, params: Value) -> Result<U256, ChainError> {
        let value = self.transport.call(method, params).await?;
        let text = value
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("{} returned {}", method, value)))?;
        parse_quantity(text)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        let value = self.transport.call("eth_blockNumber", json!([])).await?;
        value
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_blockNumber returned {}", value)))
            .and_then(parse_quantity_u64)
    }
}

fn hash_hex(hash: &TxHash) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

fn address_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_bytes()))
}

fn parse_hash(text: &str) -> Result<TxHash, ChainError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits).map_err(|e| ChainError::Decode(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(ChainError::Decode(format!("'{}' is not a transaction hash", text)));
    }
    Ok(TxHash::from_slice(&bytes))
}

fn parse_receipt(tx_hash: TxHash, value: &Value) -> Result<Receipt, ChainError> {
    let block_number = value
        .get("blockNumber")
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Decode("receipt without blockNumber".into()))
        .and_then(parse_quantity_u64)?;

    // Receipts from before Byzantium carry no status; inclusion is success.
    let status = match value.get("status").and_then(Value::as_str) {
        Some(status) if parse_quantity(status)?.is_zero() => ReceiptStatus::Failed,
        _ => ReceiptStatus::Success,
    };

    Ok(Receipt {
        tx_hash,
        status,
        block_number,
    })
}

#[async_trait]
impl<T: RpcTransport> ChainClient for EthRpcClient<T> {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn sequence_count(&self, address: Address, mode: SequenceMode) -> Result<u64, ChainError> {
        let tag = match mode {
            SequenceMode::Confirmed => "latest",
            SequenceMode::Pending => "pending",
        };
        let value = self
            .transport
            .call("eth_getTransactionCount", json!([address_hex(&address), tag]))
            .await?;
        value
            .as_str()
            .ok_or_else(|| ChainError::Decode(format!("eth_getTransactionCount returned {}", value)))
            .and_then(parse_quantity_u64)
    }

    async fn fee_estimate(&self) -> Result<U256, ChainError> {
        self.call_quantity("eth_gasPrice", json!([])).await
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let value = self
            .transport
            .call("eth_getTransactionReceipt", json!([hash_hex(&tx_hash)]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        parse_receipt(tx_hash, &value).map(Some)
    }

    async fn broadcast(&self, request: TransferRequest) -> Result<TxHash, ChainError> {
        let signed = LegacyTransaction::from_request(&request, self.config.chain_id).sign(&self.key)?;

        let value = self
            .transport
            .call("eth_sendRawTransaction", json!([signed.raw_hex()]))
            .await?;

        let hash = match value.as_str().map(parse_hash) {
            Some(Ok(hash)) => hash,
            _ => {
                warn!(response = %value, "Unexpected eth_sendRawTransaction result, using local hash");
                signed.hash
            }
        };
        info!(
            sender = %to_checksum(&self.sender),
            sequence = request.nonce,
            tx_hash = %short_hash(&hash),
            "Transfer broadcast"
        );
        Ok(hash)
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<Receipt, ChainError> {
        let deadline = Instant::now() + self.config.confirmation_timeout();

        loop {
            if let Some(receipt) = self.receipt(tx_hash).await? {
                let target = receipt.block_number + confirmations.saturating_sub(1);
                if confirmations <= 1 || self.block_number().await? >= target {
                    debug!(tx_hash = %short_hash(&tx_hash), block = receipt.block_number, "Confirmed");
                    return Ok(receipt);
                }
            }

            if Instant::now() >= deadline {
                return Err(ChainError::Timeout(hash_hex(&tx_hash)));
            }
            sleep(self.config.poll_interval()).await;
        }
    }
}
