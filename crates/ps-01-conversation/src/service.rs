//! Conversation Service - event intake and the broadcast edge
//!
//! Events for one identity are processed to completion one at a time. The
//! session map lock is only held for lookups and updates, never across an
//! outbound emission or the broadcast call.

use crate::domain::{
    transition_for, Input, Session, SessionState, SessionStore, Stage, StateMachine,
    ValidationRules,
};
use crate::error::{BroadcastError, ConversationError, ConversationResult, ValidationError};
use crate::metrics;
use crate::ports::inbound::{Command, ConversationApi, EventPayload, InboundEvent};
use crate::ports::outbound::{
    CredentialSource, MenuOption, MessageSink, OutboundMessage, TransferBroadcaster,
};
use crate::prompts;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    short_hash, AssetTable, CredentialKind, Identity, TimeSource, Timestamp, U256,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Conversation configuration
#[derive(Clone, Debug)]
pub struct ConversationConfig {
    /// Idle time after which a session is purged
    pub session_timeout_ms: u64,
    /// Required endpoint prefix; the project id follows it
    pub endpoint_prefix: String,
    /// Lowest accepted gas price, in wei
    pub min_fee_wei: U256,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            session_timeout_ms: 30 * 60 * 1000,
            endpoint_prefix: "https://mainnet.infura.io/v3/".to_string(),
            // 0.1 gwei
            min_fee_wei: U256::from(100_000_000u64),
        }
    }
}

/// Conversation service
pub struct ConversationService<M, B, C>
where
    M: MessageSink,
    B: TransferBroadcaster,
    C: CredentialSource,
{
    machine: StateMachine,
    sessions: Mutex<SessionStore>,
    sink: Arc<M>,
    broadcaster: Arc<B>,
    credentials: Arc<C>,
    clock: Arc<dyn TimeSource>,
}

impl<M, B, C> ConversationService<M, B, C>
where
    M: MessageSink,
    B: TransferBroadcaster,
    C: CredentialSource,
{
    pub fn new(
        config: ConversationConfig,
        assets: AssetTable,
        sink: Arc<M>,
        broadcaster: Arc<B>,
        credentials: Arc<C>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let rules = ValidationRules::new(config.endpoint_prefix, config.min_fee_wei, assets);
        Self {
            machine: StateMachine::new(rules),
            sessions: Mutex::new(SessionStore::new(config.session_timeout_ms)),
            sink,
            broadcaster,
            credentials,
            clock,
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        self.machine.rules()
    }

    async fn say(&self, identity: &Identity, text: String, options: Vec<Vec<MenuOption>>) {
        self.sink
            .emit(OutboundMessage::new(identity.clone(), text).with_options(options))
            .await;
    }

    fn current_stage(&self, identity: &Identity) -> Option<Stage> {
        self.sessions.lock().get(identity).map(|s| s.stage.clone())
    }

    fn options_for(&self, state: SessionState) -> Vec<Vec<MenuOption>> {
        let saved = |kind: CredentialKind| -> Vec<Vec<MenuOption>> {
            self.credentials
                .saved(kind)
                .into_iter()
                .map(|option| vec![option])
                .collect()
        };
        match state {
            SessionState::AwaitingEndpoint => saved(CredentialKind::Endpoint),
            SessionState::AwaitingKey => saved(CredentialKind::SigningKey),
            SessionState::AwaitingAsset => prompts::asset_menu(self.rules().assets()),
            SessionState::Confirming => prompts::confirm_menu(),
            SessionState::Idle | SessionState::Completed | SessionState::Cancelled => {
                prompts::main_menu()
            }
            _ => Vec::new(),
        }
    }

    async fn prompt(&self, identity: &Identity, stage: &Stage) {
        let text = match stage {
            Stage::Confirming(draft) => prompts::summary(draft),
            other => prompts::prompt_for(other.state(), self.rules()),
        };
        self.say(identity, text, self.options_for(stage.state())).await;
    }

    /// Install a fresh session at `stage`, replacing any previous one.
    fn open_session(&self, identity: &Identity, stage: Stage, now: Timestamp) {
        self.sessions
            .lock()
            .put(Session::new(identity.clone(), stage, now));
        metrics::record_session_started();
    }

    async fn run_command(
        &self,
        identity: &Identity,
        command: Command,
        now: Timestamp,
    ) -> ConversationResult<SessionState> {
        debug!(identity = %identity, command = command.name(), "Command received");
        match command {
            Command::Start => {
                self.open_session(identity, Stage::Idle, now);
                self.say(identity, prompts::welcome(), prompts::main_menu())
                    .await;
                Ok(SessionState::Idle)
            }
            Command::Help => {
                self.say(identity, prompts::help(), prompts::main_menu()).await;
                Ok(self.session_state(identity).unwrap_or(SessionState::Idle))
            }
            Command::Transaction => {
                self.open_session(identity, Stage::AwaitingEndpoint, now);
                info!(identity = %identity, "Transfer dialogue started");
                self.prompt(identity, &Stage::AwaitingEndpoint).await;
                Ok(SessionState::AwaitingEndpoint)
            }
            Command::Cancel => {
                let removed = self.sessions.lock().remove(identity);
                if let Some(session) = removed {
                    info!(identity = %identity, state = %session.state(), "Session reset");
                }
                self.say(identity, prompts::operation_cancelled(), prompts::main_menu())
                    .await;
                Ok(SessionState::Cancelled)
            }
            other => {
                let state = self.session_state(identity).unwrap_or(SessionState::Idle);
                self.say(identity, prompts::unknown_command(other.name()), Vec::new())
                    .await;
                Err(ConversationError::UnexpectedInput { state })
            }
        }
    }

    async fn reject(
        &self,
        identity: &Identity,
        state: SessionState,
        error: ValidationError,
    ) -> ConversationResult<SessionState> {
        metrics::record_rejection(state.as_str());
        debug!(identity = %identity, state = %state, reason = %error, "Input rejected");
        self.say(identity, prompts::rejection(&error), self.options_for(state))
            .await;
        Err(ConversationError::Validation(error))
    }

    async fn collect(
        &self,
        identity: &Identity,
        input: Input<'_>,
        now: Timestamp,
    ) -> ConversationResult<SessionState> {
        let Some(stage) = self.current_stage(identity) else {
            self.say(identity, prompts::idle_hint(), prompts::main_menu())
                .await;
            return Err(ConversationError::NoSession);
        };
        let state = stage.state();
        if transition_for(state).is_none() {
            let hint = if state == SessionState::Confirming {
                prompts::confirm_hint()
            } else {
                prompts::idle_hint()
            };
            self.say(identity, hint, self.options_for(state)).await;
            return Err(ConversationError::UnexpectedInput { state });
        }

        let revealed;
        let input = match input {
            Input::Selection { key: "cred", value: id } => {
                let kind = match state {
                    SessionState::AwaitingEndpoint => Some(CredentialKind::Endpoint),
                    SessionState::AwaitingKey => Some(CredentialKind::SigningKey),
                    _ => None,
                };
                match kind.and_then(|kind| self.credentials.reveal(id, kind)) {
                    Some(secret) => {
                        revealed = secret;
                        Input::Text(&revealed)
                    }
                    None => {
                        return self
                            .reject(identity, state, ValidationError::UnknownCredential)
                            .await
                    }
                }
            }
            other => other,
        };

        let next = match self.machine.step(&stage, input) {
            Ok(next) => next,
            Err(ConversationError::Validation(error)) => {
                return self.reject(identity, state, error).await
            }
            Err(other) => {
                self.say(identity, prompts::idle_hint(), Vec::new()).await;
                return Err(other);
            }
        };

        let applied = {
            let mut sessions = self.sessions.lock();
            match sessions.get_mut(identity) {
                Some(session) if session.stage == stage => {
                    session.stage = next.clone();
                    session.last_activity_at = now;
                    true
                }
                _ => false,
            }
        };
        if !applied {
            warn!(identity = %identity, "Session changed while input was validated");
            return Err(ConversationError::UnexpectedInput { state });
        }

        debug!(identity = %identity, from = %state, to = %next.state(), "Session advanced");
        self.prompt(identity, &next).await;
        Ok(next.state())
    }

    async fn confirm(
        &self,
        identity: &Identity,
        accepted: bool,
        now: Timestamp,
    ) -> ConversationResult<SessionState> {
        let draft = match self.current_stage(identity) {
            Some(Stage::Confirming(draft)) => draft,
            Some(other) => {
                let state = other.state();
                self.say(identity, prompts::idle_hint(), self.options_for(state))
                    .await;
                return Err(ConversationError::UnexpectedInput { state });
            }
            None => {
                self.say(identity, prompts::idle_hint(), prompts::main_menu())
                    .await;
                return Err(ConversationError::NoSession);
            }
        };

        if !accepted {
            self.sessions.lock().remove(identity);
            info!(identity = %identity, "Transfer declined at confirmation");
            self.say(identity, prompts::transfer_cancelled(), prompts::main_menu())
                .await;
            return Ok(SessionState::Cancelled);
        }

        if let Some(session) = self.sessions.lock().get_mut(identity) {
            session.last_activity_at = now;
        }

        match self.broadcaster.broadcast(identity, &draft).await {
            Ok(receipt) => {
                metrics::record_broadcast("success");
                {
                    let mut sessions = self.sessions.lock();
                    if let Some(session) = sessions.get_mut(identity) {
                        if session.state() == SessionState::Confirming {
                            session.stage = Stage::Completed {
                                transfer_id: receipt.transfer_id,
                            };
                        }
                    }
                }
                info!(
                    identity = %identity,
                    tx_hash = %short_hash(&receipt.transfer_id),
                    sequence = receipt.sequence_number,
                    asset = %draft.asset.symbol,
                    "Transfer broadcast"
                );
                self.say(
                    identity,
                    prompts::submitted(&receipt),
                    prompts::main_menu(),
                )
                .await;
                Ok(SessionState::Completed)
            }
            Err(BroadcastError(cause)) => {
                metrics::record_broadcast("failure");
                warn!(identity = %identity, error = %cause, "Broadcast failed");
                self.say(
                    identity,
                    prompts::broadcast_failed(&cause),
                    prompts::confirm_menu(),
                )
                .await;
                Err(ConversationError::BroadcastFailure { cause })
            }
        }
    }
}

#[async_trait]
impl<M, B, C> ConversationApi for ConversationService<M, B, C>
where
    M: MessageSink,
    B: TransferBroadcaster,
    C: CredentialSource,
{
    async fn handle_event(&self, event: InboundEvent) -> ConversationResult<SessionState> {
        let InboundEvent { identity, payload } = event;
        let now = self.clock.now();

        let expired = self.sessions.lock().expire(&identity, now);
        if let Some(session) = expired {
            metrics::record_expired(1);
            info!(identity = %identity, state = %session.state(), "Session expired");
            self.say(&identity, prompts::expired(), Vec::new()).await;
            return Err(ConversationError::SessionExpired);
        }

        if let Some(command) = Command::from_payload(&payload) {
            return self.run_command(&identity, command, now).await;
        }

        match &payload {
            EventPayload::Selection(value) => match value.split_once(':') {
                Some(("confirm", answer)) => self.confirm(&identity, answer == "yes", now).await,
                Some((key, value)) => {
                    self.collect(&identity, Input::Selection { key, value }, now)
                        .await
                }
                None => {
                    let state = self.session_state(&identity).unwrap_or(SessionState::Idle);
                    self.say(&identity, prompts::unknown_selection(), Vec::new())
                        .await;
                    Err(ConversationError::UnexpectedInput { state })
                }
            },
            EventPayload::Text(text) => {
                if self.session_state(&identity) == Some(SessionState::Confirming) {
                    match text.trim().to_ascii_lowercase().as_str() {
                        "yes" | "y" => return self.confirm(&identity, true, now).await,
                        "no" | "n" => return self.confirm(&identity, false, now).await,
                        _ => {}
                    }
                }
                self.collect(&identity, Input::Text(text), now).await
            }
        }
    }

    fn session_state(&self, identity: &Identity) -> Option<SessionState> {
        self.sessions.lock().get(identity).map(|s| s.state())
    }

    fn reset(&self, identity: &Identity) -> Option<SessionState> {
        self.sessions.lock().remove(identity).map(|s| s.state())
    }

    async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let expired = self.sessions.lock().expire_all(now);
        for session in &expired {
            info!(identity = %session.identity, state = %session.state(), "Session expired");
            self.say(&session.identity, prompts::expired(), Vec::new())
                .await;
        }
        metrics::record_expired(expired.len());
        expired.len()
    }
}
