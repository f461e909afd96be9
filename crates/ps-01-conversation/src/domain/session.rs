//! Sessions and their typed stage data.
//!
//! Each stage carries exactly the fields collected so far, so a state can
//! never read a field that has not been supplied yet.

use shared_types::{Address, AssetConfig, Identity, SigningSecret, Timestamp, TxHash, U256};
use std::fmt;

/// Session state labels, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionState {
    Idle,
    AwaitingEndpoint,
    AwaitingKey,
    AwaitingAsset,
    AwaitingTarget,
    AwaitingAmount,
    AwaitingFee,
    Confirming,
    Completed,
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::AwaitingEndpoint => "AWAITING_ENDPOINT",
            Self::AwaitingKey => "AWAITING_KEY",
            Self::AwaitingAsset => "AWAITING_ASSET",
            Self::AwaitingTarget => "AWAITING_TARGET",
            Self::AwaitingAmount => "AWAITING_AMOUNT",
            Self::AwaitingFee => "AWAITING_FEE",
            Self::Confirming => "CONFIRMING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Endpoint plus signing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub signing_key: SigningSecret,
}

impl Credentials {
    pub fn sender(&self) -> Address {
        self.signing_key.address()
    }
}

/// Fully collected transfer, ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDraft {
    pub credentials: Credentials,
    pub asset: AssetConfig,
    pub target: Address,
    /// Amount in the asset's base units
    pub amount: U256,
    /// Gas price in wei
    pub fee: U256,
}

/// Current state plus the data collected to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    AwaitingEndpoint,
    AwaitingKey {
        endpoint: String,
    },
    AwaitingAsset {
        credentials: Credentials,
    },
    AwaitingTarget {
        credentials: Credentials,
        asset: AssetConfig,
    },
    AwaitingAmount {
        credentials: Credentials,
        asset: AssetConfig,
        target: Address,
    },
    AwaitingFee {
        credentials: Credentials,
        asset: AssetConfig,
        target: Address,
        amount: U256,
    },
    Confirming(TransferDraft),
    Completed {
        transfer_id: TxHash,
    },
    Cancelled,
}

impl Stage {
    pub fn state(&self) -> SessionState {
        match self {
            Self::Idle => SessionState::Idle,
            Self::AwaitingEndpoint => SessionState::AwaitingEndpoint,
            Self::AwaitingKey { .. } => SessionState::AwaitingKey,
            Self::AwaitingAsset { .. } => SessionState::AwaitingAsset,
            Self::AwaitingTarget { .. } => SessionState::AwaitingTarget,
            Self::AwaitingAmount { .. } => SessionState::AwaitingAmount,
            Self::AwaitingFee { .. } => SessionState::AwaitingFee,
            Self::Confirming(_) => SessionState::Confirming,
            Self::Completed { .. } => SessionState::Completed,
            Self::Cancelled => SessionState::Cancelled,
        }
    }

    /// Asset chosen so far, if any.
    pub fn asset(&self) -> Option<&AssetConfig> {
        match self {
            Self::AwaitingTarget { asset, .. }
            | Self::AwaitingAmount { asset, .. }
            | Self::AwaitingFee { asset, .. } => Some(asset),
            Self::Confirming(draft) => Some(&draft.asset),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&TransferDraft> {
        match self {
            Self::Confirming(draft) => Some(draft),
            _ => None,
        }
    }
}

/// One conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub stage: Stage,
    pub last_activity_at: Timestamp,
}

impl Session {
    pub fn new(identity: Identity, stage: Stage, now: Timestamp) -> Self {
        Self {
            identity,
            stage,
            last_activity_at: now,
        }
    }

    pub fn state(&self) -> SessionState {
        self.stage.state()
    }

    pub fn is_expired(&self, now: Timestamp, timeout_ms: u64) -> bool {
        now.saturating_sub(self.last_activity_at) > timeout_ms
    }
}
