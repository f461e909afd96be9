//! Chain client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Gas limit for ERC-20 transfers.
    pub token_gas_limit: u64,
    /// Gas limit for zero-value replacements.
    pub cancel_gas_limit: u64,
    pub receipt_poll_interval_ms: u64,
    pub confirmation_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            token_gas_limit: 100_000,
            cancel_gas_limit: 21_000,
            receipt_poll_interval_ms: 4_000,
            confirmation_timeout_secs: 600,
            request_timeout_secs: 30,
        }
    }
}

impl ChainConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
