//! Field validation rules.
//!
//! Each rule parses raw operator text into the typed value stored on the
//! session, or explains what is wrong with it.

use crate::error::ValidationError;
use shared_types::{
    format_units, parse_address, parse_units, Address, AssetConfig, AssetTable, SigningSecret,
    UnitsError, GWEI_DECIMALS, U256,
};

/// Rules applied at each collecting state.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    endpoint_prefix: String,
    min_fee_wei: U256,
    assets: AssetTable,
}

impl ValidationRules {
    pub fn new(endpoint_prefix: impl Into<String>, min_fee_wei: U256, assets: AssetTable) -> Self {
        Self {
            endpoint_prefix: endpoint_prefix.into(),
            min_fee_wei,
            assets,
        }
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    pub fn endpoint_prefix(&self) -> &str {
        &self.endpoint_prefix
    }

    /// Fee floor rendered in gwei.
    pub fn fee_floor(&self) -> String {
        format_units(self.min_fee_wei, GWEI_DECIMALS)
    }

    /// `<prefix><project-id>` where the id is a non-empty run of
    /// alphanumerics, `-` or `_`.
    pub fn endpoint(&self, text: &str) -> Result<String, ValidationError> {
        let invalid = || ValidationError::InvalidEndpoint {
            expected_prefix: self.endpoint_prefix.clone(),
        };
        let project_id = text.strip_prefix(self.endpoint_prefix.as_str()).ok_or_else(invalid)?;
        if project_id.is_empty()
            || !project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid());
        }
        Ok(text.to_string())
    }

    pub fn signing_key(&self, text: &str) -> Result<SigningSecret, ValidationError> {
        SigningSecret::parse(text).ok_or(ValidationError::InvalidKey)
    }

    pub fn asset(&self, symbol: &str) -> Result<AssetConfig, ValidationError> {
        self.assets
            .get(symbol)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownAsset(symbol.to_string()))
    }

    pub fn target(&self, text: &str) -> Result<Address, ValidationError> {
        parse_address(text).ok_or(ValidationError::InvalidAddress)
    }

    /// Positive decimal amount in the asset's base units.
    pub fn amount(&self, text: &str, asset: &AssetConfig) -> Result<U256, ValidationError> {
        let value = parse_units(text, asset.decimals).map_err(|e| match e {
            UnitsError::NotANumber(_) | UnitsError::Overflow => ValidationError::InvalidAmount,
            UnitsError::TooManyDecimals { max, .. } => ValidationError::TooManyDecimals { max },
        })?;
        if value.is_zero() {
            return Err(ValidationError::InvalidAmount);
        }
        Ok(value)
    }

    /// Gas price typed in gwei, returned in wei.
    pub fn fee(&self, text: &str) -> Result<U256, ValidationError> {
        let value = parse_units(text, GWEI_DECIMALS).map_err(|e| match e {
            UnitsError::TooManyDecimals { max, .. } => ValidationError::TooManyDecimals { max },
            _ => ValidationError::InvalidNumber(text.to_string()),
        })?;
        if value < self.min_fee_wei {
            return Err(ValidationError::FeeBelowFloor {
                floor: self.fee_floor(),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ValidationRules {
        ValidationRules::new(
            "https://mainnet.infura.io/v3/",
            U256::from(100_000_000u64),
            AssetTable::mainnet(),
        )
    }

    #[test]
    fn test_endpoint_accepts_provider_url() {
        assert!(rules().endpoint("https://mainnet.infura.io/v3/abc").is_ok());
    }

    #[test]
    fn test_endpoint_rejects_other_urls() {
        let rules = rules();
        for bad in [
            "http://x",
            "https://mainnet.infura.io/v3/",
            "http://mainnet.infura.io/v3/abc",
            "https://sepolia.infura.io/v3/abc",
            "https://mainnet.infura.io/v3/abc/extra",
            "https://mainnet.infura.io/v3/abc def",
        ] {
            assert!(
                matches!(rules.endpoint(bad), Err(ValidationError::InvalidEndpoint { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_signing_key() {
        let rules = rules();
        let key = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
        assert!(rules.signing_key(key).is_ok());
        assert_eq!(rules.signing_key("not-a-key"), Err(ValidationError::InvalidKey));
    }

    #[test]
    fn test_asset_lookup() {
        let rules = rules();
        assert_eq!(rules.asset("LINK").unwrap().decimals, 18);
        assert!(matches!(rules.asset("XYZ"), Err(ValidationError::UnknownAsset(_))));
    }

    #[test]
    fn test_target_address() {
        let rules = rules();
        assert!(rules.target("0x6B175474E89094C44Da98b954EedeAC495271d0F").is_ok());
        assert_eq!(rules.target("0x123"), Err(ValidationError::InvalidAddress));
    }

    #[test]
    fn test_amount_rules() {
        let rules = rules();
        let usdt = rules.asset("USDT").unwrap();
        assert_eq!(rules.amount("4000", &usdt).unwrap(), U256::from(4_000_000_000u64));
        assert_eq!(rules.amount("0", &usdt), Err(ValidationError::InvalidAmount));
        assert_eq!(rules.amount("-5", &usdt), Err(ValidationError::InvalidAmount));
        assert_eq!(rules.amount("ten", &usdt), Err(ValidationError::InvalidAmount));
        assert_eq!(
            rules.amount("0.0000001", &usdt),
            Err(ValidationError::TooManyDecimals { max: 6 })
        );
    }

    #[test]
    fn test_fee_floor() {
        let rules = rules();
        assert_eq!(rules.fee("0.1").unwrap(), U256::from(100_000_000u64));
        assert_eq!(rules.fee("2").unwrap(), U256::from(2_000_000_000u64));
        assert_eq!(
            rules.fee("0.09"),
            Err(ValidationError::FeeBelowFloor { floor: "0.1".into() })
        );
        assert!(matches!(rules.fee("fast"), Err(ValidationError::InvalidNumber(_))));
    }
}
