//! # Transfer Flow
//!
//! Dialogue → `ChainBroadcaster` → tracker → reconcile timer, against a
//! scripted chain.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use ps_01_conversation::{ConversationApi, ConversationError, SessionState};
    use ps_04_eth_rpc::erc20_transfer_calldata;
    use shared_types::{parse_address, to_checksum, AssetTable, ChainClient, ReceiptStatus, U256};

    #[tokio::test]
    async fn test_confirmed_dialogue_broadcasts_token_transfer() {
        let chain = chain();
        chain.set_counts(12, 12);
        let op = Operator::in_memory(chain.clone());

        assert_eq!(
            op.send_transfer("USDT", "25", "1.5").await,
            Ok(SessionState::Completed)
        );
        assert!(op.sink.last_text().contains("Transaction Submitted"));
        assert!(op.sink.last_text().contains("Nonce: 12"));

        let sent = chain.broadcasts();
        assert_eq!(sent.len(), 1);
        let usdt = AssetTable::mainnet().get("USDT").unwrap().contract;
        assert_eq!(sent[0].to, usdt);
        assert!(sent[0].value.is_zero());
        assert_eq!(sent[0].nonce, 12);
        assert_eq!(sent[0].gas_price, U256::from(1_500_000_000u64));
        assert_eq!(sent[0].gas_limit, 100_000);
        assert_eq!(
            sent[0].data,
            erc20_transfer_calldata(parse_address(TARGET).unwrap(), U256::from(25_000_000u64))
        );
    }

    #[tokio::test]
    async fn test_reconcile_reports_confirmation_and_clears_status() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("DAI", "2.5", "3").await.unwrap();

        op.text("/status").await;
        assert!(op.sink.last_text().contains("#0 DAI · 3 Gwei"));

        // Still pending: nothing to report.
        assert_eq!(op.reconciler().tick().await, 0);

        let hash = chain.broadcast_hashes()[0];
        chain.include(hash, ReceiptStatus::Success);
        chain.set_counts(1, 1);
        assert_eq!(op.reconciler().tick().await, 1);
        assert!(op
            .sink
            .last_text()
            .starts_with("✅ Transaction #0 (DAI) confirmed"));

        op.text("/status").await;
        assert_eq!(op.sink.last_text(), "✅ No pending transactions.");

        op.text("/history").await;
        assert!(op.sink.last_text().contains("2.5 DAI (nonce 0)"));
    }

    #[tokio::test]
    async fn test_reverted_transfer_reported_as_failed() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("LINK", "1", "1").await.unwrap();

        chain.include(chain.broadcast_hashes()[0], ReceiptStatus::Failed);
        chain.set_counts(1, 1);
        assert_eq!(op.reconciler().tick().await, 1);
        assert!(op.sink.last_text().contains("#0 (LINK) failed on chain"));
    }

    #[tokio::test]
    async fn test_second_transfer_refused_while_first_pending() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDT", "10", "1").await.unwrap();

        let result = op.send_transfer("USDT", "10", "1").await;
        match result {
            Err(ConversationError::BroadcastFailure { cause }) => {
                assert!(cause.contains("1 pending transaction(s)"))
            }
            other => panic!("expected a refused broadcast, got {:?}", other),
        }
        assert_eq!(chain.broadcasts().len(), 1);
        // The draft survives for a retry.
        assert_eq!(
            op.container.conversation.session_state(&op.me),
            Some(SessionState::Confirming)
        );
    }

    #[tokio::test]
    async fn test_broadcast_remembers_credentials_for_next_dialogue() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDC", "5", "1").await.unwrap();
        chain.set_counts(1, 1);

        state(op.text("/transaction").await).unwrap();
        let endpoint = op.first_option();
        assert!(endpoint.starts_with("cred:"));
        assert_eq!(state(op.select(&endpoint).await), Ok(SessionState::AwaitingKey));

        let key_option = op.sink.last().unwrap().options[0][0].clone();
        assert!(key_option.label.contains(&to_checksum(&chain.sender())));
        assert_eq!(
            state(op.select(&key_option.value).await),
            Ok(SessionState::AwaitingAsset)
        );
    }

    #[tokio::test]
    async fn test_idle_session_purged_by_reconcile_tick() {
        let op = Operator::in_memory(chain());
        state(op.text("/transaction").await).unwrap();

        op.clock.advance(31 * 60 * 1000);
        op.reconciler().tick().await;

        assert_eq!(op.container.conversation.session_state(&op.me), None);
        assert!(op.sink.last_text().contains("session has expired"));
    }

    #[tokio::test]
    async fn test_clear_drops_session_and_pending_state() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDT", "1", "1").await.unwrap();
        state(op.text("/transaction").await).unwrap();

        op.text("/clear").await;
        assert_eq!(op.container.conversation.session_state(&op.me), None);
        assert!(op.sink.last_text().contains("Stopped tracking 1"));

        op.text("/status").await;
        assert_eq!(op.sink.last_text(), "✅ No pending transactions.");
    }
}
