//! # Blockchain Client Capability
//!
//! Read and write operations the conversation and tracker subsystems need
//! from a chain node. Implementations own signing: callers hand over an
//! unsigned [`TransferRequest`] and receive the chain-assigned hash.

use crate::entities::{Address, TxHash, U256};
use crate::errors::ChainError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which sequence count to read for an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceMode {
    /// Transfers included in the latest block.
    Confirmed,
    /// Confirmed transfers plus those waiting in the node's pool.
    Pending,
}

/// An unsigned transfer, signed by the client that broadcasts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
}

impl TransferRequest {
    /// Zero-value transfer to `own_address` at `nonce`.
    ///
    /// Competing for an occupied nonce with a higher gas price replaces the
    /// transfer currently holding it.
    pub fn replacement(own_address: Address, nonce: u64, gas_price: U256, gas_limit: u64) -> Self {
        Self {
            to: own_address,
            value: U256::zero(),
            data: Vec::new(),
            nonce,
            gas_price,
            gas_limit,
        }
    }
}

/// Outcome recorded in a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

/// Inclusion record of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
    pub block_number: u64,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

/// Chain node capability bound to one sender account.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing account.
    fn sender(&self) -> Address;

    /// Number of transfers sent from `address` in the given mode.
    async fn sequence_count(&self, address: Address, mode: SequenceMode) -> Result<u64, ChainError>;

    /// Current network fee estimate (gas price in wei).
    async fn fee_estimate(&self) -> Result<U256, ChainError>;

    /// Receipt for `tx_hash`, or `None` while it is not included.
    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError>;

    /// Sign and broadcast. Returns once the node accepts it into its pool.
    async fn broadcast(&self, request: TransferRequest) -> Result<TxHash, ChainError>;

    /// Wait until `tx_hash` has `confirmations` blocks on top of inclusion.
    ///
    /// Bounded only by the implementation's own timeout.
    async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<Receipt, ChainError>;
}
