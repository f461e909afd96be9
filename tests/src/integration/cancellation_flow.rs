//! # Cancellation Flow
//!
//! `/cancel_pending` replaces the lowest pending sequence with a zero-value
//! self-transfer at twice the dominant fee.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use ps_02_pending_tracker::PendingTrackerApi;
    use sender_runtime::Dispatch;
    use shared_types::{ChainClient, ReceiptStatus, U256};

    fn gwei(n: u64) -> U256 {
        U256::from(n) * U256::from(GWEI)
    }

    #[tokio::test]
    async fn test_cancel_replaces_with_double_network_fee() {
        let chain = chain();
        chain.set_counts(4, 4);
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDT", "100", "2").await.unwrap();
        chain.set_fee(gwei(3));

        finish(op.text("/cancel_pending").await).await;

        let sent = chain.broadcasts();
        assert_eq!(sent.len(), 2);
        let replacement = &sent[1];
        assert_eq!(replacement.nonce, 4);
        assert_eq!(replacement.to, chain.sender());
        assert!(replacement.value.is_zero());
        assert!(replacement.data.is_empty());
        assert_eq!(replacement.gas_limit, 21_000);
        assert_eq!(replacement.gas_price, gwei(6));

        let text = op.sink.last_text();
        assert!(text.contains("Pending transaction #4 cancelled"));
        assert!(text.contains("Gas Price: 6 Gwei"));

        op.text("/status").await;
        assert_eq!(op.sink.last_text(), "✅ No pending transactions.");
        op.text("/history").await;
        assert!(op.sink.last_text().contains("Cancellation of #4"));
    }

    #[tokio::test]
    async fn test_original_fee_dominates_quiet_network() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDT", "1", "5").await.unwrap();
        chain.set_fee(gwei(1));

        finish(op.text("/cancel_pending").await).await;
        assert_eq!(chain.broadcasts()[1].gas_price, gwei(10));
    }

    #[tokio::test]
    async fn test_reverted_replacement_keeps_transfer_pending() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("WETH", "0.5", "1").await.unwrap();
        chain.confirm_with(ReceiptStatus::Failed);

        finish(op.text("/cancel_pending").await).await;
        assert!(op.sink.last_text().starts_with("❌ Cancellation failed"));

        op.text("/status").await;
        assert!(op.sink.last_text().contains("#0 WETH"));
    }

    #[tokio::test]
    async fn test_cancel_without_pending_transfer() {
        let op = Operator::in_memory(chain());
        assert!(matches!(op.text("/cancel_pending").await, Dispatch::Handled));
        assert_eq!(op.sink.last_text(), "No pending transactions to cancel.");
    }

    #[tokio::test]
    async fn test_reconcile_and_second_cancel_during_confirmation_wait() {
        let chain = chain();
        let op = Operator::in_memory(chain.clone());
        op.send_transfer("USDT", "1", "1").await.unwrap();
        let release = chain.hold_confirmations();

        let first = op.text("/cancel_pending").await;
        while chain.broadcasts().len() < 2 {
            tokio::task::yield_now().await;
        }

        // No gap on chain, but the set is kept while the replacement waits.
        chain.set_counts(1, 1);
        assert_eq!(op.reconciler().tick().await, 0);
        let tracker = op.container.trackers.get(&op.me).unwrap();
        assert_eq!(tracker.pending().len(), 1);

        assert!(matches!(op.text("/cancel_pending").await, Dispatch::Handled));
        assert_eq!(op.sink.last_text(), "⏳ Cancellation already in progress.");

        release.notify_one();
        finish(first).await;
        assert!(tracker.pending().is_empty());
        assert_eq!(chain.broadcasts().len(), 2);
    }
}
