//! # Chain Broadcaster
//!
//! The conversation's broadcast edge. For a confirmed draft it:
//!
//! 1. connects a chain client for the draft's endpoint and key and attaches
//!    the identity's tracker (restoring the sender's saved pending set),
//! 2. stops tracking saved entries at or above the node's pending nonce,
//! 3. refuses when earlier transfers are still pending (unless stacking is
//!    allowed),
//! 4. sends an ERC-20 `transfer` at the next pending nonce with the chosen
//!    gas price,
//! 5. records the broadcast with the tracker and history,
//! 6. remembers the endpoint and key in the vault.
//!
//! The tracker is attached before the refusal so that `/status` and
//! `/cancel_pending` see transfers left pending by an earlier run.
//! Steps 5 and 6 never fail the broadcast: the transfer is already in the
//! node's pool by then. Released entries and a tracking failure are
//! reported as notes on the receipt.

use crate::adapters::chain::ChainFactory;
use crate::adapters::history::{HistoryEntry, HistoryKind, TransferHistory};
use crate::adapters::trackers::TrackerRegistry;
use async_trait::async_trait;
use ps_01_conversation::{
    BroadcastError, BroadcastReceipt, Credentials, TransferBroadcaster, TransferDraft,
};
use ps_02_pending_tracker::{PendingTrackerApi, PendingTransfer};
use ps_03_credentials::CredentialAdapter;
use ps_04_eth_rpc::erc20_transfer_calldata;
use shared_types::{
    format_units, short_hash, to_checksum, ChainClient, ChainError, Identity, SequenceMode,
    TimeSource, TransferRequest, U256,
};
use std::sync::Arc;
use tracing::{info, warn};

pub struct ChainBroadcaster {
    chains: Arc<dyn ChainFactory>,
    trackers: Arc<TrackerRegistry>,
    history: Arc<TransferHistory>,
    vault: Arc<CredentialAdapter>,
    clock: Arc<dyn TimeSource>,
    token_gas_limit: u64,
    allow_stacked_pending: bool,
}

impl ChainBroadcaster {
    pub fn new(
        chains: Arc<dyn ChainFactory>,
        trackers: Arc<TrackerRegistry>,
        history: Arc<TransferHistory>,
        vault: Arc<CredentialAdapter>,
        clock: Arc<dyn TimeSource>,
        token_gas_limit: u64,
        allow_stacked_pending: bool,
    ) -> Self {
        Self {
            chains,
            trackers,
            history,
            vault,
            clock,
            token_gas_limit,
            allow_stacked_pending,
        }
    }

    fn remember(&self, credentials: &Credentials) {
        if let Err(e) = self.vault.remember_endpoint(&credentials.endpoint, None) {
            warn!(error = %e, "Endpoint not saved");
        }
        if let Err(e) = self.vault.remember_key(&credentials.signing_key.expose(), None) {
            warn!(error = %e, "Signing key not saved");
        }
    }
}

fn describe(error: ChainError) -> BroadcastError {
    if error.is_already_known() {
        return BroadcastError(
            "Transaction already in the pool, wait for it to be processed".to_string(),
        );
    }
    BroadcastError(error.to_string())
}

fn stacked_refusal(gap: u64) -> BroadcastError {
    BroadcastError(format!(
        "You have {} pending transaction(s). Wait for them to confirm or use /cancel_pending first",
        gap
    ))
}

#[async_trait]
impl TransferBroadcaster for ChainBroadcaster {
    async fn broadcast(
        &self,
        identity: &Identity,
        draft: &TransferDraft,
    ) -> Result<BroadcastReceipt, BroadcastError> {
        let credentials = &draft.credentials;
        let chain = self
            .chains
            .connect(&credentials.endpoint, &credentials.signing_key)
            .map_err(describe)?;
        let sender = chain.sender();
        let tracker = self.trackers.attach(identity, chain.clone());

        let nonce = chain
            .sequence_count(sender, SequenceMode::Pending)
            .await
            .map_err(describe)?;
        let mut notes: Vec<String> = tracker
            .release_from(nonce)
            .iter()
            .map(|released| {
                format!(
                    "Stopped tracking #{} ({}): the node no longer holds it.",
                    released.sequence_number, released.asset
                )
            })
            .collect();
        if !self.allow_stacked_pending {
            let confirmed = chain
                .sequence_count(sender, SequenceMode::Confirmed)
                .await
                .map_err(describe)?;
            if nonce > confirmed {
                info!(identity = %identity, gap = nonce - confirmed, "Refusing stacked transfer");
                return Err(stacked_refusal(nonce - confirmed));
            }
        }

        let request = TransferRequest {
            to: draft.asset.contract,
            value: U256::zero(),
            data: erc20_transfer_calldata(draft.target, draft.amount),
            nonce,
            gas_price: draft.fee,
            gas_limit: self.token_gas_limit,
        };
        let tx_hash = chain.broadcast(request).await.map_err(describe)?;
        let now = self.clock.now();

        let pending = PendingTransfer::new(tx_hash, nonce, draft.asset.symbol.clone(), draft.fee, now);
        if let Err(e) = tracker.record_broadcast(pending) {
            warn!(identity = %identity, sequence = nonce, error = %e, "Broadcast not tracked");
            notes.push(format!(
                "This transfer is not tracked ({}). /status and /cancel_pending will not show it.",
                e
            ));
        }

        self.history.record(
            identity,
            HistoryEntry {
                tx_hash,
                sequence_number: nonce,
                kind: HistoryKind::Transfer {
                    asset: draft.asset.symbol.clone(),
                    amount: format_units(draft.amount, draft.asset.decimals),
                },
                at: now,
            },
        );
        self.remember(credentials);

        info!(
            identity = %identity,
            sender = %to_checksum(&sender),
            sequence = nonce,
            tx_hash = %short_hash(&tx_hash),
            "Transfer left pending"
        );
        Ok(BroadcastReceipt {
            transfer_id: tx_hash,
            sequence_number: nonce,
            notes,
        })
    }
}
