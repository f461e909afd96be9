//! # Runtime Configuration
//!
//! Plain structs with defaults, overridden from `PS_*` environment variables
//! by [`load_config`] and checked by [`RuntimeConfig::validate`].

use ps_01_conversation::ConversationConfig;
use ps_02_pending_tracker::TrackerConfig;
use ps_04_eth_rpc::ChainConfig;
use shared_types::{parse_units, U256, GWEI_DECIMALS};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub conversation: ConversationSettings,
    pub tracker: TrackerSettings,
    pub chain: ChainConfig,
    pub storage: StorageConfig,
    pub console: ConsoleConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: cannot parse '{value}'")]
    Unparsable { key: &'static str, value: String },

    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Dialogue settings.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    /// Idle time after which a session is discarded.
    pub session_timeout_secs: u64,
    /// Required endpoint prefix.
    pub endpoint_prefix: String,
    /// Lowest accepted gas price, decimal gwei.
    pub min_fee_gwei: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            session_timeout_secs: 30 * 60,
            endpoint_prefix: "https://mainnet.infura.io/v3/".to_string(),
            min_fee_gwei: "0.1".to_string(),
        }
    }
}

/// Pending-transfer settings.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub reconcile_interval_secs: u64,
    /// Confirmations awaited for a replacement.
    pub confirmations: u64,
    /// Forget unreceipted transfers once the account shows no pending gap.
    pub clear_on_no_gap: bool,
    /// Broadcast even when earlier transfers are still pending.
    pub allow_stacked_pending: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            reconcile_interval_secs: 10,
            confirmations: 1,
            clear_on_no_gap: true,
            allow_stacked_pending: false,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Holds `credentials.json` and `pending/`.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Console channel configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Identity used for everything typed on the console.
    pub identity: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            identity: "operator".to_string(),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Unparsable { key, value })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Unparsable { key, value }),
    }
}

impl RuntimeConfig {
    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("PS_SESSION_TIMEOUT_SECS") {
            config.conversation.session_timeout_secs = parse("PS_SESSION_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("PS_ENDPOINT_PREFIX") {
            config.conversation.endpoint_prefix = v.trim().to_string();
        }
        if let Some(v) = lookup("PS_MIN_FEE_GWEI") {
            config.conversation.min_fee_gwei = v.trim().to_string();
        }

        if let Some(v) = lookup("PS_RECONCILE_INTERVAL_SECS") {
            config.tracker.reconcile_interval_secs = parse("PS_RECONCILE_INTERVAL_SECS", v)?;
        }
        if let Some(v) = lookup("PS_CONFIRMATIONS") {
            config.tracker.confirmations = parse("PS_CONFIRMATIONS", v)?;
        }
        if let Some(v) = lookup("PS_CLEAR_ON_NO_GAP") {
            config.tracker.clear_on_no_gap = parse_flag("PS_CLEAR_ON_NO_GAP", v)?;
        }
        if let Some(v) = lookup("PS_ALLOW_STACKED_PENDING") {
            config.tracker.allow_stacked_pending = parse_flag("PS_ALLOW_STACKED_PENDING", v)?;
        }

        if let Some(v) = lookup("PS_CHAIN_ID") {
            config.chain.chain_id = parse("PS_CHAIN_ID", v)?;
        }
        if let Some(v) = lookup("PS_CONFIRMATION_TIMEOUT_SECS") {
            config.chain.confirmation_timeout_secs = parse("PS_CONFIRMATION_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("PS_RECEIPT_POLL_INTERVAL_MS") {
            config.chain.receipt_poll_interval_ms = parse("PS_RECEIPT_POLL_INTERVAL_MS", v)?;
        }

        if let Some(v) = lookup("PS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(v.trim());
        }
        if let Some(v) = lookup("PS_CONSOLE_IDENTITY") {
            config.console.identity = v.trim().to_string();
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &'static str, reason: &str| ConfigError::Invalid {
            key,
            reason: reason.to_string(),
        };

        if self.conversation.session_timeout_secs == 0 {
            return Err(invalid("PS_SESSION_TIMEOUT_SECS", "must be positive"));
        }
        if !self.conversation.endpoint_prefix.starts_with("https://") {
            return Err(invalid("PS_ENDPOINT_PREFIX", "must start with https://"));
        }
        self.min_fee_wei()?;
        if self.tracker.reconcile_interval_secs == 0 {
            return Err(invalid("PS_RECONCILE_INTERVAL_SECS", "must be positive"));
        }
        if self.tracker.confirmations == 0 {
            return Err(invalid("PS_CONFIRMATIONS", "must be at least 1"));
        }
        if self.chain.chain_id == 0 {
            return Err(invalid("PS_CHAIN_ID", "must be positive"));
        }
        if self.chain.receipt_poll_interval_ms == 0 {
            return Err(invalid("PS_RECEIPT_POLL_INTERVAL_MS", "must be positive"));
        }
        if self.console.identity.is_empty() {
            return Err(invalid("PS_CONSOLE_IDENTITY", "must not be empty"));
        }
        Ok(())
    }

    pub fn min_fee_wei(&self) -> Result<U256, ConfigError> {
        parse_units(&self.conversation.min_fee_gwei, GWEI_DECIMALS).map_err(|e| {
            ConfigError::Invalid {
                key: "PS_MIN_FEE_GWEI",
                reason: e.to_string(),
            }
        })
    }

    pub fn conversation_config(&self) -> Result<ConversationConfig, ConfigError> {
        Ok(ConversationConfig {
            session_timeout_ms: self.conversation.session_timeout_secs * 1000,
            endpoint_prefix: self.conversation.endpoint_prefix.clone(),
            min_fee_wei: self.min_fee_wei()?,
        })
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            confirmations: self.tracker.confirmations,
            cancel_gas_limit: self.chain.cancel_gas_limit,
            clear_on_no_gap: self.tracker.clear_on_no_gap,
        }
    }

    pub fn vault_path(&self) -> PathBuf {
        self.storage.data_dir.join("credentials.json")
    }

    pub fn pending_dir(&self) -> PathBuf {
        self.storage.data_dir.join("pending")
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<RuntimeConfig, ConfigError> {
    RuntimeConfig::from_lookup(|key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.conversation.session_timeout_secs, 1800);
        assert_eq!(config.tracker.reconcile_interval_secs, 10);
        assert!(config.tracker.clear_on_no_gap);
        assert!(!config.tracker.allow_stacked_pending);
        assert_eq!(config.chain.token_gas_limit, 100_000);
        assert_eq!(config.chain.cancel_gas_limit, 21_000);
        assert_eq!(config.min_fee_wei().unwrap(), U256::from(100_000_000u64));
        assert_eq!(config.vault_path(), PathBuf::from("./data/credentials.json"));
        assert_eq!(config.pending_dir(), PathBuf::from("./data/pending"));
    }

    #[test]
    fn test_env_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("PS_SESSION_TIMEOUT_SECS", "60"),
            ("PS_MIN_FEE_GWEI", "2.5"),
            ("PS_CLEAR_ON_NO_GAP", "false"),
            ("PS_ALLOW_STACKED_PENDING", "yes"),
            ("PS_DATA_DIR", "/var/lib/ps"),
            ("PS_CHAIN_ID", "11155111"),
        ]))
        .unwrap();

        assert_eq!(config.conversation_config().unwrap().session_timeout_ms, 60_000);
        assert_eq!(config.min_fee_wei().unwrap(), U256::from(2_500_000_000u64));
        assert!(!config.tracker_config().clear_on_no_gap);
        assert!(config.tracker.allow_stacked_pending);
        assert_eq!(config.pending_dir(), PathBuf::from("/var/lib/ps/pending"));
        assert_eq!(config.chain.chain_id, 11_155_111);
    }

    #[test]
    fn test_unparsable_values() {
        let err = RuntimeConfig::from_lookup(lookup(&[("PS_RECONCILE_INTERVAL_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Unparsable {
                key: "PS_RECONCILE_INTERVAL_SECS",
                ..
            }
        ));

        assert!(RuntimeConfig::from_lookup(lookup(&[("PS_CLEAR_ON_NO_GAP", "maybe")])).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RuntimeConfig::default();
        config.conversation.min_fee_gwei = "-1".into();
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.conversation.endpoint_prefix = "http://mainnet.infura.io/v3/".into();
        assert!(config.validate().is_err());

        let mut config = RuntimeConfig::default();
        config.tracker.reconcile_interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
