//! # Asset Table
//!
//! Static table of the fungible assets an operator can transfer.

use crate::entities::{parse_address, Address};
use serde::{Deserialize, Serialize};

/// One ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub symbol: String,
    pub name: String,
    pub contract: Address,
    pub decimals: u8,
}

impl AssetConfig {
    /// Menu label, e.g. `Tether USD (USDT)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

const MAINNET_TOKENS: &[(&str, &str, &str, u8)] = &[
    ("USDT", "Tether USD", "0xdAC17F958D2ee523a2206206994597C13D831ec7", 6),
    ("USDC", "USD Coin", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
    ("WBTC", "Wrapped Bitcoin", "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", 8),
    ("DAI", "Dai Stablecoin", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
    ("BUSD", "Binance USD", "0x4Fabb145d64652a948d72533023f6E7A623C7C53", 18),
    ("EURC", "Euro Coin", "0x1aBaEA1f7C830bD89Acc67eC4af516284b1bC33c", 6),
    ("PEPE", "Pepe", "0x6982508145454Ce325dDbE47a25d4ec3d2311933", 18),
    ("LINK", "ChainLink Token", "0x514910771AF9Ca656af840dff83E8264EcF986CA", 18),
    ("WETH", "Wrapped Ether", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
    ("SHIB", "Shiba Inu", "0x95aD61b0a150d79219dCF64E1E6Cc01f0B64C4cE", 18),
];

/// Ordered, immutable lookup table of assets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetTable {
    assets: Vec<AssetConfig>,
}

impl AssetTable {
    pub fn new(assets: Vec<AssetConfig>) -> Self {
        Self { assets }
    }

    /// The Ethereum mainnet token set.
    pub fn mainnet() -> Self {
        let assets = MAINNET_TOKENS
            .iter()
            .filter_map(|(symbol, name, contract, decimals)| {
                Some(AssetConfig {
                    symbol: (*symbol).to_string(),
                    name: (*name).to_string(),
                    contract: parse_address(contract)?,
                    decimals: *decimals,
                })
            })
            .collect();
        Self { assets }
    }

    /// Case-insensitive lookup by symbol.
    pub fn get(&self, symbol: &str) -> Option<&AssetConfig> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetConfig> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_table_is_complete() {
        // Every contract literal must pass the checksum parser.
        let table = AssetTable::mainnet();
        assert_eq!(table.len(), MAINNET_TOKENS.len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = AssetTable::mainnet();
        let usdt = table.get("usdt").unwrap();
        assert_eq!(usdt.decimals, 6);
        assert_eq!(usdt.label(), "Tether USD (USDT)");
        assert!(table.get("DOGE").is_none());
    }
}
