//! Test helpers shared by the subsystem crates.
//!
//! [`ScriptedChain`] is an in-memory [`ChainClient`] whose answers are set
//! by the test. Broadcasts are recorded, receipts are injected by hand and
//! confirmation waits can be held open to exercise concurrent callers.

use crate::chain::{ChainClient, Receipt, ReceiptStatus, SequenceMode, TransferRequest};
use crate::entities::{keccak256, Address, TxHash, U256};
use crate::errors::ChainError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug)]
struct ScriptedState {
    confirmed_count: u64,
    pending_count: u64,
    fee: U256,
    block_number: u64,
    receipts: HashMap<TxHash, Receipt>,
    sent: Vec<(TxHash, TransferRequest)>,
    broadcast_error: Option<ChainError>,
    receipt_error: Option<ChainError>,
    confirmation_error: Option<ChainError>,
    confirmation_status: ReceiptStatus,
}

/// Scripted chain bound to one sender account.
#[derive(Debug)]
pub struct ScriptedChain {
    sender: Address,
    state: Mutex<ScriptedState>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedChain {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            state: Mutex::new(ScriptedState {
                confirmed_count: 0,
                pending_count: 0,
                fee: U256::from(1_000_000_000u64),
                block_number: 100,
                receipts: HashMap::new(),
                sent: Vec::new(),
                broadcast_error: None,
                receipt_error: None,
                confirmation_error: None,
                confirmation_status: ReceiptStatus::Success,
            }),
            gate: Mutex::new(None),
        }
    }

    pub fn set_counts(&self, confirmed: u64, pending: u64) {
        let mut state = self.state.lock();
        state.confirmed_count = confirmed;
        state.pending_count = pending;
    }

    pub fn set_fee(&self, fee: U256) {
        self.state.lock().fee = fee;
    }

    /// Make `tx_hash` visible as included with the given status.
    pub fn include(&self, tx_hash: TxHash, status: ReceiptStatus) {
        let mut state = self.state.lock();
        state.block_number += 1;
        let block_number = state.block_number;
        state.receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                status,
                block_number,
            },
        );
    }

    pub fn fail_broadcasts(&self, error: ChainError) {
        self.state.lock().broadcast_error = Some(error);
    }

    pub fn fail_receipts(&self, error: ChainError) {
        self.state.lock().receipt_error = Some(error);
    }

    pub fn restore_receipts(&self) {
        self.state.lock().receipt_error = None;
    }

    pub fn fail_confirmations(&self, error: ChainError) {
        self.state.lock().confirmation_error = Some(error);
    }

    /// Status given to transfers that reach confirmation.
    pub fn confirm_with(&self, status: ReceiptStatus) {
        self.state.lock().confirmation_status = status;
    }

    /// Hold every `wait_for_confirmation` until the returned handle is
    /// notified once per waiter.
    pub fn hold_confirmations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock() = Some(notify.clone());
        notify
    }

    /// Requests accepted by `broadcast`, in order.
    pub fn broadcasts(&self) -> Vec<TransferRequest> {
        self.state.lock().sent.iter().map(|(_, r)| r.clone()).collect()
    }

    /// Hashes returned by `broadcast`, in order.
    pub fn broadcast_hashes(&self) -> Vec<TxHash> {
        self.state.lock().sent.iter().map(|(h, _)| *h).collect()
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    fn sender(&self) -> Address {
        self.sender
    }

    async fn sequence_count(&self, _address: Address, mode: SequenceMode) -> Result<u64, ChainError> {
        let state = self.state.lock();
        Ok(match mode {
            SequenceMode::Confirmed => state.confirmed_count,
            SequenceMode::Pending => state.pending_count,
        })
    }

    async fn fee_estimate(&self) -> Result<U256, ChainError> {
        Ok(self.state.lock().fee)
    }

    async fn receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>, ChainError> {
        let state = self.state.lock();
        if let Some(err) = &state.receipt_error {
            return Err(err.clone());
        }
        Ok(state.receipts.get(&tx_hash).cloned())
    }

    async fn broadcast(&self, request: TransferRequest) -> Result<TxHash, ChainError> {
        let mut state = self.state.lock();
        if let Some(err) = &state.broadcast_error {
            return Err(err.clone());
        }

        let mut preimage = Vec::with_capacity(48);
        preimage.extend_from_slice(&request.nonce.to_be_bytes());
        preimage.extend_from_slice(&(state.sent.len() as u64).to_be_bytes());
        let mut price = [0u8; 32];
        request.gas_price.to_big_endian(&mut price);
        preimage.extend_from_slice(&price);
        let tx_hash = TxHash::from(keccak256(&preimage));

        state.pending_count = state.pending_count.max(request.nonce + 1);
        state.sent.push((tx_hash, request));
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        _confirmations: u64,
    ) -> Result<Receipt, ChainError> {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock();
        if let Some(err) = &state.confirmation_error {
            return Err(err.clone());
        }

        let nonce = state
            .sent
            .iter()
            .find(|(h, _)| *h == tx_hash)
            .map(|(_, r)| r.nonce)
            .ok_or_else(|| ChainError::Timeout(format!("{:?}", tx_hash)))?;

        state.block_number += 1;
        let receipt = Receipt {
            tx_hash,
            status: state.confirmation_status,
            block_number: state.block_number,
        };
        state.receipts.insert(tx_hash, receipt.clone());
        state.confirmed_count = state.confirmed_count.max(nonce + 1);
        Ok(receipt)
    }
}
