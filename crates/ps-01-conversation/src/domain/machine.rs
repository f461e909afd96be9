//! Transition table and the pure step function.
//!
//! Each collecting state names the field it accepts and the state it moves
//! to. `StateMachine::step` looks the current state up in [`TRANSITIONS`],
//! validates the input for that field and builds the next stage. It never
//! mutates the stage it is given.

use super::session::{Credentials, SessionState, Stage, TransferDraft};
use super::validation::ValidationRules;
use crate::error::{ConversationError, ConversationResult, ValidationError};
use shared_types::{Address, AssetConfig, SigningSecret, U256};

/// Field collected by a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Endpoint,
    SigningKey,
    Asset,
    Target,
    Amount,
    Fee,
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub field: Field,
    pub to: SessionState,
}

pub const TRANSITIONS: [Transition; 6] = [
    Transition {
        from: SessionState::AwaitingEndpoint,
        field: Field::Endpoint,
        to: SessionState::AwaitingKey,
    },
    Transition {
        from: SessionState::AwaitingKey,
        field: Field::SigningKey,
        to: SessionState::AwaitingAsset,
    },
    Transition {
        from: SessionState::AwaitingAsset,
        field: Field::Asset,
        to: SessionState::AwaitingTarget,
    },
    Transition {
        from: SessionState::AwaitingTarget,
        field: Field::Target,
        to: SessionState::AwaitingAmount,
    },
    Transition {
        from: SessionState::AwaitingAmount,
        field: Field::Amount,
        to: SessionState::AwaitingFee,
    },
    Transition {
        from: SessionState::AwaitingFee,
        field: Field::Fee,
        to: SessionState::Confirming,
    },
];

pub fn transition_for(state: SessionState) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.from == state)
}

/// Raw operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    /// Menu choice, `key:value` on the wire
    Selection { key: &'a str, value: &'a str },
}

enum Collected {
    Endpoint(String),
    SigningKey(SigningSecret),
    Asset(AssetConfig),
    Target(Address),
    Amount(U256),
    Fee(U256),
}

impl Stage {
    fn advance(self, value: Collected) -> Option<Stage> {
        let next = match (self, value) {
            (Stage::AwaitingEndpoint, Collected::Endpoint(endpoint)) => {
                Stage::AwaitingKey { endpoint }
            }
            (Stage::AwaitingKey { endpoint }, Collected::SigningKey(signing_key)) => {
                Stage::AwaitingAsset {
                    credentials: Credentials {
                        endpoint,
                        signing_key,
                    },
                }
            }
            (Stage::AwaitingAsset { credentials }, Collected::Asset(asset)) => {
                Stage::AwaitingTarget { credentials, asset }
            }
            (Stage::AwaitingTarget { credentials, asset }, Collected::Target(target)) => {
                Stage::AwaitingAmount {
                    credentials,
                    asset,
                    target,
                }
            }
            (
                Stage::AwaitingAmount {
                    credentials,
                    asset,
                    target,
                },
                Collected::Amount(amount),
            ) => Stage::AwaitingFee {
                credentials,
                asset,
                target,
                amount,
            },
            (
                Stage::AwaitingFee {
                    credentials,
                    asset,
                    target,
                    amount,
                },
                Collected::Fee(fee),
            ) => Stage::Confirming(TransferDraft {
                credentials,
                asset,
                target,
                amount,
                fee,
            }),
            _ => return None,
        };
        Some(next)
    }
}

/// Table-driven state machine over [`Stage`].
#[derive(Debug, Clone)]
pub struct StateMachine {
    rules: ValidationRules,
}

impl StateMachine {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Validate `input` for the current state and return the next stage.
    pub fn step(&self, stage: &Stage, input: Input<'_>) -> ConversationResult<Stage> {
        let state = stage.state();
        let transition = transition_for(state).ok_or(ConversationError::UnexpectedInput { state })?;
        let value = self.collect(transition.field, stage, input)?;

        stage
            .clone()
            .advance(value)
            .ok_or(ConversationError::UnexpectedInput { state })
    }

    fn collect(&self, field: Field, stage: &Stage, input: Input<'_>) -> ConversationResult<Collected> {
        let text = match (field, input) {
            (Field::Asset, Input::Selection { key: "token", value }) => value,
            (_, Input::Text(text)) => text.trim(),
            (_, Input::Selection { .. }) => return Err(ValidationError::UnexpectedSelection.into()),
        };

        let value = match field {
            Field::Endpoint => Collected::Endpoint(self.rules.endpoint(text)?),
            Field::SigningKey => Collected::SigningKey(self.rules.signing_key(text)?),
            Field::Asset => Collected::Asset(self.rules.asset(text)?),
            Field::Target => Collected::Target(self.rules.target(text)?),
            Field::Amount => {
                let asset = stage.asset().ok_or(ConversationError::UnexpectedInput {
                    state: stage.state(),
                })?;
                Collected::Amount(self.rules.amount(text, asset)?)
            }
            Field::Fee => Collected::Fee(self.rules.fee(text)?),
        };
        Ok(value)
    }
}
