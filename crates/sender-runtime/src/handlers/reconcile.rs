//! # Reconcile Loop
//!
//! Fixed-interval task: purges expired sessions, reconciles every tracker
//! that holds transfers (or last saw a pending gap) and tells each owner
//! what left their pending set.
//!
//! A failing reconcile is reported once when it starts failing and once
//! when it recovers; the ticks in between only log.

use crate::adapters::TrackerRegistry;
use parking_lot::Mutex;
use ps_01_conversation::prompts::EXPLORER_TX_URL;
use ps_01_conversation::{ConversationApi, MessageSink, OutboundMessage};
use ps_02_pending_tracker::{PendingTrackerApi, PendingTransfer, ReconcileReport};
use shared_types::Identity;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub struct ReconcileLoop<S: MessageSink + 'static> {
    conversation: Arc<dyn ConversationApi>,
    trackers: Arc<TrackerRegistry>,
    sink: Arc<S>,
    failing: Mutex<HashSet<Identity>>,
}

impl<S: MessageSink + 'static> ReconcileLoop<S> {
    pub fn new(
        conversation: Arc<dyn ConversationApi>,
        trackers: Arc<TrackerRegistry>,
        sink: Arc<S>,
    ) -> Self {
        Self {
            conversation,
            trackers,
            sink,
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// One pass. Returns the number of operator notifications sent.
    pub async fn tick(&self) -> usize {
        let expired = self.conversation.purge_expired().await;
        if expired > 0 {
            debug!(expired, "Expired sessions purged");
        }

        let mut notified = 0;
        for (identity, tracker) in self.trackers.all() {
            let idle = tracker.pending().is_empty() && tracker.last_gap().unwrap_or(0) == 0;
            if idle {
                continue;
            }
            match tracker.reconcile().await {
                Ok(report) => {
                    let recovered = self.failing.lock().remove(&identity);
                    if recovered {
                        info!(identity = %identity, "Reconcile recovered");
                        self.say(&identity, recovered_text()).await;
                        notified += 1;
                    }
                    notified += self.notify(&identity, &report).await;
                }
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Reconcile failed");
                    let first_failure = self.failing.lock().insert(identity.clone());
                    if first_failure {
                        self.say(&identity, reconcile_failed_text(&e.to_string()))
                            .await;
                        notified += 1;
                    }
                }
            }
        }
        notified
    }

    async fn notify(&self, identity: &Identity, report: &ReconcileReport) -> usize {
        let texts: Vec<String> = report
            .confirmed
            .iter()
            .map(confirmed_text)
            .chain(report.failed.iter().map(failed_text))
            .chain(report.dropped.iter().map(dropped_text))
            .collect();

        let sent = texts.len();
        for text in texts {
            self.say(identity, text).await;
        }
        sent
    }

    async fn say(&self, identity: &Identity, text: String) {
        self.sink
            .emit(OutboundMessage::new(identity.clone(), text))
            .await;
    }

    /// Tick every `interval` until `shutdown` changes.
    pub async fn run(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), "Reconcile loop started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    info!("Reconcile loop stopping");
                    break;
                }
            }
        }
    }
}

fn confirmed_text(transfer: &PendingTransfer) -> String {
    format!(
        "✅ Transaction #{} ({}) confirmed\n{}{:?}",
        transfer.sequence_number, transfer.asset, EXPLORER_TX_URL, transfer.transfer_id
    )
}

fn failed_text(transfer: &PendingTransfer) -> String {
    format!(
        "❌ Transaction #{} ({}) failed on chain\n{}{:?}",
        transfer.sequence_number, transfer.asset, EXPLORER_TX_URL, transfer.transfer_id
    )
}

fn reconcile_failed_text(cause: &str) -> String {
    format!(
        "⚠️ Could not check your pending transactions: {}\n\
         Retrying in the background; /status may be out of date.",
        cause
    )
}

fn recovered_text() -> String {
    "✅ Pending transaction checks are working again.".to_string()
}

fn dropped_text(transfer: &PendingTransfer) -> String {
    format!(
        "ℹ️ Transaction #{} ({}) is no longer pending on the account; stopped tracking it.",
        transfer.sequence_number, transfer.asset
    )
}
