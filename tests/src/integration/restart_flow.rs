//! # Restart Flow
//!
//! The credential vault and the pending sets live in JSON files; a new
//! process picks both up again.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use ps_01_conversation::{ConversationError, SessionState};
    use ps_02_pending_tracker::{JsonFilePendingStore, PendingStore};
    use shared_types::ChainClient;

    #[tokio::test]
    async fn test_pending_transfer_survives_restart_and_can_be_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let chain = chain();

        {
            let first_run = Operator::on_disk(chain.clone(), dir.path());
            first_run.send_transfer("USDT", "7", "1").await.unwrap();
        }

        let op = Operator::on_disk(chain.clone(), dir.path());
        state(op.text("/transaction").await).unwrap();
        let endpoint = op.first_option();
        assert!(endpoint.starts_with("cred:"));
        state(op.select(&endpoint).await).unwrap();
        let key = op.first_option();
        assert_eq!(state(op.select(&key).await), Ok(SessionState::AwaitingAsset));
        state(op.select("token:USDT").await).unwrap();
        state(op.text(TARGET).await).unwrap();
        state(op.text("7").await).unwrap();
        state(op.text("1").await).unwrap();

        // Refused, but the tracker is attached with the restored set.
        assert!(matches!(
            state(op.select("confirm:yes").await),
            Err(ConversationError::BroadcastFailure { .. })
        ));
        op.text("/status").await;
        assert!(op.sink.last_text().contains("#0 USDT"));

        finish(op.text("/cancel_pending").await).await;
        assert!(op.sink.last_text().contains("Pending transaction #0 cancelled"));

        let store = JsonFilePendingStore::new(dir.path().join("pending"));
        assert!(store.load(&chain.sender()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vault_file_does_not_hold_plain_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let op = Operator::on_disk(chain(), dir.path());
        op.send_transfer("USDT", "1", "1").await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("credentials.json")).unwrap();
        assert!(!contents.contains(&KEY[2..]));
        assert!(!contents.contains("0123456789abcdef"));
        assert!(contents.contains("SigningKey"));
    }
}
