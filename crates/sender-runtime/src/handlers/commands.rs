//! # Command Dispatcher
//!
//! Routes every inbound event. The tracker-facing commands (`/status`,
//! `/history`, `/cancel_pending`, `/clear`) are answered here because they
//! need the identity's tracker; everything else goes to the conversation.
//!
//! `/cancel_pending` runs on its own task: the replacement waits for
//! confirmation, and the console keeps serving other input meanwhile.

use crate::adapters::{HistoryEntry, HistoryKind, TrackerRegistry, TransferHistory};
use ps_01_conversation::prompts::{self, EXPLORER_TX_URL};
use ps_01_conversation::{
    Command, ConversationApi, ConversationResult, InboundEvent, MessageSink, OutboundMessage,
    SessionState,
};
use ps_02_pending_tracker::{CancelOutcome, PendingTrackerApi, PendingTransfer, TrackerError};
use shared_types::{format_units, Identity, TimeSource, Timestamp, GWEI_DECIMALS};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// What became of one inbound event.
#[derive(Debug)]
pub enum Dispatch {
    /// Handled by the conversation service.
    Conversation(ConversationResult<SessionState>),
    /// Answered by the dispatcher.
    Handled,
    /// A cancellation is running on the returned task.
    Cancelling(JoinHandle<()>),
}

/// Cancellation tasks started by the console, kept so shutdown can wait
/// for replacements still awaiting confirmation.
#[derive(Debug, Default)]
pub struct CancellationTasks {
    handles: Vec<JoinHandle<()>>,
}

impl CancellationTasks {
    pub fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Tasks that have not finished yet.
    pub fn outstanding(&mut self) -> usize {
        self.handles.retain(|h| !h.is_finished());
        self.handles.len()
    }

    /// Wait for every task to finish.
    pub async fn wait(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Cancellation task ended abnormally");
            }
        }
    }

    pub fn shutdown_notice(outstanding: usize) -> String {
        format!(
            "⏳ Waiting for {} cancellation(s) to confirm before exiting.\n\
             Press Ctrl+C again to exit now; the replacement stays in the node's pool \
             and /status shows it after a restart.",
            outstanding
        )
    }
}

pub struct CommandDispatcher<S: MessageSink + 'static> {
    conversation: Arc<dyn ConversationApi>,
    trackers: Arc<TrackerRegistry>,
    history: Arc<TransferHistory>,
    sink: Arc<S>,
    clock: Arc<dyn TimeSource>,
}

impl<S: MessageSink + 'static> CommandDispatcher<S> {
    pub fn new(
        conversation: Arc<dyn ConversationApi>,
        trackers: Arc<TrackerRegistry>,
        history: Arc<TransferHistory>,
        sink: Arc<S>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            conversation,
            trackers,
            history,
            sink,
            clock,
        }
    }

    pub async fn dispatch(&self, event: InboundEvent) -> Dispatch {
        match Command::from_payload(&event.payload) {
            Some(Command::Status) => {
                self.status(&event.identity).await;
                Dispatch::Handled
            }
            Some(Command::History) => {
                self.history(&event.identity).await;
                Dispatch::Handled
            }
            Some(Command::CancelPending) => self.cancel_pending(&event.identity).await,
            Some(Command::Clear) => {
                self.clear(&event.identity).await;
                Dispatch::Handled
            }
            _ => Dispatch::Conversation(self.conversation.handle_event(event).await),
        }
    }

    async fn say(&self, identity: &Identity, text: String) {
        self.sink
            .emit(OutboundMessage::new(identity.clone(), text).with_options(prompts::main_menu()))
            .await;
    }

    async fn status(&self, identity: &Identity) {
        let now = self.clock.now();
        let (pending, gap) = match self.trackers.get(identity) {
            Some(tracker) => (tracker.pending(), tracker.last_gap()),
            None => (Vec::new(), None),
        };
        self.say(identity, status_text(&pending, gap, now)).await;
    }

    async fn history(&self, identity: &Identity) {
        let entries = self.history.entries(identity);
        self.say(identity, history_text(&entries)).await;
    }

    async fn clear(&self, identity: &Identity) {
        self.conversation.reset(identity);
        let forgotten = self
            .trackers
            .get(identity)
            .map(|tracker| tracker.clear().len())
            .unwrap_or(0);
        info!(identity = %identity, forgotten, "Session and pending state cleared");

        let text = if forgotten == 0 {
            "🧹 Session cleared.".to_string()
        } else {
            format!(
                "🧹 Session cleared. Stopped tracking {} pending transaction(s); \
                 they may still confirm on chain.",
                forgotten
            )
        };
        self.say(identity, text).await;
    }

    async fn cancel_pending(&self, identity: &Identity) -> Dispatch {
        let tracker = match self.trackers.get(identity) {
            Some(tracker) if !tracker.pending().is_empty() => tracker,
            _ => {
                self.say(identity, "No pending transactions to cancel.".to_string())
                    .await;
                return Dispatch::Handled;
            }
        };
        if tracker.is_cancelling() {
            self.say(identity, "⏳ Cancellation already in progress.".to_string())
                .await;
            return Dispatch::Handled;
        }

        self.say(
            identity,
            "⏳ Replacing the oldest pending transaction with a higher fee. \
             This may take a few minutes..."
                .to_string(),
        )
        .await;

        let identity = identity.clone();
        let sink = self.sink.clone();
        let history = self.history.clone();
        let clock = self.clock.clone();
        let handle = tokio::spawn(async move {
            let text = match tracker.cancel().await {
                Ok(outcome) => {
                    history.record(
                        &identity,
                        HistoryEntry {
                            tx_hash: outcome.replacement_hash,
                            sequence_number: outcome.cancelled.sequence_number,
                            kind: HistoryKind::Cancellation {
                                replaced: outcome.cancelled.sequence_number,
                            },
                            at: clock.now(),
                        },
                    );
                    cancelled_text(&outcome)
                }
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Cancel request failed");
                    cancel_failed_text(&e)
                }
            };
            sink.emit(OutboundMessage::new(identity, text).with_options(prompts::main_menu()))
                .await;
        });
        Dispatch::Cancelling(handle)
    }
}

fn format_age(ms: u64) -> String {
    let secs = ms / 1000;
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m {}s", secs / 60, secs % 60),
        _ => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
    }
}

fn status_text(pending: &[PendingTransfer], gap: Option<u64>, now: Timestamp) -> String {
    let gap = gap.unwrap_or(0);
    if pending.is_empty() {
        if gap == 0 {
            return "✅ No pending transactions.".to_string();
        }
        // The account gap is authoritative even when nothing is tracked locally.
        return format!(
            "⚠️ The account shows {} unconfirmed transaction(s) that are not tracked here.",
            gap
        );
    }

    let mut text = format!("📊 Pending transactions: {}\n", pending.len());
    for transfer in pending {
        text.push_str(&format!(
            "\n#{} {} · {} Gwei · {}\n{}{:?}",
            transfer.sequence_number,
            transfer.asset,
            format_units(transfer.fee_paid, GWEI_DECIMALS),
            format_age(transfer.age_ms(now)),
            EXPLORER_TX_URL,
            transfer.transfer_id,
        ));
    }
    if gap > 0 {
        text.push_str(&format!("\n\nUnconfirmed on chain: {}", gap));
    }
    text.push_str("\n\nUse /cancel_pending to replace the oldest one.");
    text
}

fn history_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No transactions yet. Use /transaction to create one.".to_string();
    }

    let mut text = "📜 Transaction History\n".to_string();
    for entry in entries {
        let what = match &entry.kind {
            HistoryKind::Transfer { asset, amount } => format!("{} {}", amount, asset),
            HistoryKind::Cancellation { replaced } => format!("Cancellation of #{}", replaced),
        };
        text.push_str(&format!(
            "\n• {} (nonce {})\n{}{:?}",
            what, entry.sequence_number, EXPLORER_TX_URL, entry.tx_hash
        ));
    }
    text
}

fn cancelled_text(outcome: &CancelOutcome) -> String {
    format!(
        "✅ Pending transaction #{} cancelled\n\n\
         Replacement: {:?}\n\
         Gas Price: {} Gwei\n\
         Block: {}\n\
         {}{:?}",
        outcome.cancelled.sequence_number,
        outcome.replacement_hash,
        format_units(outcome.replacement_fee, GWEI_DECIMALS),
        outcome.receipt.block_number,
        EXPLORER_TX_URL,
        outcome.replacement_hash,
    )
}

fn cancel_failed_text(error: &TrackerError) -> String {
    match error {
        TrackerError::NoPendingTransfer => "No pending transactions to cancel.".to_string(),
        TrackerError::CancellationInProgress => "⏳ Cancellation already in progress.".to_string(),
        other => format!("❌ Cancellation failed: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticChainFactory;
    use ps_01_conversation::testing::RecordingSink;
    use ps_01_conversation::EventPayload;
    use ps_02_pending_tracker::{InMemoryPendingStore, PendingTransferTracker, TrackerConfig};
    use shared_types::{
        Address, ChainError, ManualTimeSource, ScriptedChain, TxHash, U256,
    };

    struct NullConversation;

    #[async_trait::async_trait]
    impl ConversationApi for NullConversation {
        async fn handle_event(&self, _event: InboundEvent) -> ConversationResult<SessionState> {
            Ok(SessionState::Idle)
        }

        fn session_state(&self, _identity: &Identity) -> Option<SessionState> {
            None
        }

        fn reset(&self, _identity: &Identity) -> Option<SessionState> {
            None
        }

        async fn purge_expired(&self) -> usize {
            0
        }
    }

    struct Harness {
        dispatcher: CommandDispatcher<RecordingSink>,
        sink: Arc<RecordingSink>,
        trackers: Arc<TrackerRegistry>,
        history: Arc<TransferHistory>,
        chain: Arc<ScriptedChain>,
        clock: Arc<ManualTimeSource>,
        me: Identity,
    }

    impl Harness {
        fn new() -> Self {
            let sink = Arc::new(RecordingSink::new());
            let clock = Arc::new(ManualTimeSource::new(1_000_000));
            let trackers = Arc::new(TrackerRegistry::new(
                TrackerConfig::default(),
                Arc::new(InMemoryPendingStore::new()),
                clock.clone(),
            ));
            let history = Arc::new(TransferHistory::new());
            let dispatcher = CommandDispatcher::new(
                Arc::new(NullConversation),
                trackers.clone(),
                history.clone(),
                sink.clone(),
                clock.clone(),
            );
            Self {
                dispatcher,
                sink,
                trackers,
                history,
                chain: Arc::new(ScriptedChain::new(Address::repeat_byte(0x11))),
                clock,
                me: Identity::new("alice"),
            }
        }

        /// Track a broadcast at `sequence` paying 1 gwei.
        fn track(&self, sequence: u64) -> Arc<PendingTransferTracker> {
            let tracker = self.trackers.attach(&self.me, self.chain.clone());
            tracker
                .record_broadcast(PendingTransfer::new(
                    TxHash::repeat_byte(sequence as u8 + 1),
                    sequence,
                    "USDT",
                    U256::from(1_000_000_000u64),
                    self.clock.now(),
                ))
                .unwrap();
            tracker
        }

        async fn command(&self, text: &str) -> Dispatch {
            self.dispatcher
                .dispatch(InboundEvent::text(self.me.clone(), text))
                .await
        }
    }

    #[tokio::test]
    async fn test_non_tracker_events_reach_conversation() {
        let h = Harness::new();
        assert!(matches!(
            h.command("/start").await,
            Dispatch::Conversation(Ok(SessionState::Idle))
        ));
        assert!(matches!(
            h.command("hello").await,
            Dispatch::Conversation(Ok(SessionState::Idle))
        ));
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_status_without_pending() {
        let h = Harness::new();
        assert!(matches!(h.command("/status").await, Dispatch::Handled));
        assert_eq!(h.sink.last_text(), "✅ No pending transactions.");
    }

    #[tokio::test]
    async fn test_status_lists_pending_with_age() {
        let h = Harness::new();
        h.track(4);
        h.clock.advance(125_000);

        let event = InboundEvent {
            identity: h.me.clone(),
            payload: EventPayload::Selection("menu:status".into()),
        };
        assert!(matches!(h.dispatcher.dispatch(event).await, Dispatch::Handled));

        let text = h.sink.last_text();
        assert!(text.contains("Pending transactions: 1"));
        assert!(text.contains("#4 USDT · 1 Gwei · 2m 5s"));
    }

    #[tokio::test]
    async fn test_history_lists_entries() {
        let h = Harness::new();
        h.command("/history").await;
        assert_eq!(
            h.sink.last_text(),
            "No transactions yet. Use /transaction to create one."
        );

        h.history.record(
            &h.me,
            HistoryEntry {
                tx_hash: TxHash::repeat_byte(0xaa),
                sequence_number: 3,
                kind: HistoryKind::Transfer {
                    asset: "DAI".into(),
                    amount: "2.5".into(),
                },
                at: 0,
            },
        );
        h.command("/history").await;
        let text = h.sink.last_text();
        assert!(text.contains("2.5 DAI (nonce 3)"));
        assert!(text.contains(&format!("{}{:?}", EXPLORER_TX_URL, TxHash::repeat_byte(0xaa))));
    }

    #[tokio::test]
    async fn test_cancel_pending_without_tracker() {
        let h = Harness::new();
        assert!(matches!(h.command("/cancel_pending").await, Dispatch::Handled));
        assert_eq!(h.sink.last_text(), "No pending transactions to cancel.");
    }

    #[tokio::test]
    async fn test_cancel_pending_supersedes_and_records_history() {
        let h = Harness::new();
        let tracker = h.track(5);
        h.chain.set_fee(U256::from(3_000_000_000u64));

        let handle = match h.command("/cancel_pending").await {
            Dispatch::Cancelling(handle) => handle,
            other => panic!("expected cancellation task, got {:?}", other),
        };
        handle.await.unwrap();

        assert!(tracker.pending().is_empty());
        let text = h.sink.last_text();
        assert!(text.contains("Pending transaction #5 cancelled"));
        assert!(text.contains("Gas Price: 6 Gwei"));

        let history = h.history.entries(&h.me);
        assert_eq!(history[0].kind, HistoryKind::Cancellation { replaced: 5 });
    }

    #[tokio::test]
    async fn test_cancel_pending_reports_failure() {
        let h = Harness::new();
        let tracker = h.track(5);
        h.chain.fail_broadcasts(ChainError::Transport("connection refused".into()));

        match h.command("/cancel_pending").await {
            Dispatch::Cancelling(handle) => handle.await.unwrap(),
            other => panic!("expected cancellation task, got {:?}", other),
        }

        assert!(h.sink.last_text().starts_with("❌ Cancellation failed:"));
        assert_eq!(tracker.pending().len(), 1);
        assert!(h.history.entries(&h.me).is_empty());
    }

    #[tokio::test]
    async fn test_second_cancel_rejected_while_first_waits() {
        let h = Harness::new();
        h.track(5);
        let release = h.chain.hold_confirmations();

        let first = match h.command("/cancel_pending").await {
            Dispatch::Cancelling(handle) => handle,
            other => panic!("expected cancellation task, got {:?}", other),
        };
        // Let the spawned task reach the confirmation wait.
        while h.chain.broadcasts().is_empty() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(h.command("/cancel_pending").await, Dispatch::Handled));
        assert_eq!(h.sink.last_text(), "⏳ Cancellation already in progress.");

        release.notify_one();
        first.await.unwrap();
        assert!(h.sink.last_text().contains("cancelled"));
    }

    #[tokio::test]
    async fn test_clear_forgets_pending_state() {
        let h = Harness::new();
        let tracker = h.track(2);

        h.command("/clear").await;
        assert!(tracker.pending().is_empty());
        assert!(h.sink.last_text().contains("Stopped tracking 1 pending transaction(s)"));

        h.command("/clear").await;
        assert_eq!(h.sink.last_text(), "🧹 Session cleared.");
    }

    #[tokio::test]
    async fn test_cancellation_tasks_wait_for_running_replacement() {
        let h = Harness::new();
        h.track(5);
        let release = h.chain.hold_confirmations();
        let mut tasks = CancellationTasks::default();

        match h.command("/cancel_pending").await {
            Dispatch::Cancelling(handle) => tasks.push(handle),
            other => panic!("expected cancellation task, got {:?}", other),
        }
        while h.chain.broadcasts().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(tasks.outstanding(), 1);
        assert!(CancellationTasks::shutdown_notice(1).contains("1 cancellation(s)"));

        release.notify_one();
        tasks.wait().await;
        assert!(h.sink.last_text().contains("Pending transaction #5 cancelled"));
    }

    #[tokio::test]
    async fn test_finished_cancellations_are_not_outstanding() {
        let mut tasks = CancellationTasks::default();
        let done = tokio::spawn(async {});
        while !done.is_finished() {
            tokio::task::yield_now().await;
        }
        tasks.push(done);
        assert_eq!(tasks.outstanding(), 0);
    }

    #[test]
    fn test_status_reports_untracked_gap() {
        assert!(status_text(&[], Some(2), 0).contains("2 unconfirmed transaction(s)"));
        assert_eq!(format_age(59_999), "59s");
        assert_eq!(format_age(3_720_000), "1h 2m");
    }
}
