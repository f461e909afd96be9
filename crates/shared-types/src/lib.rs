//! # Shared Types Crate
//!
//! Types that cross subsystem boundaries: chain primitives, the static asset
//! table, the blockchain-client capability consumed by the conversation and
//! tracker subsystems, and the clock port used for deterministic tests.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `TxHash`, `U256` and the asset
//!   table are defined once here.
//! - **Capability, not implementation**: `ChainClient` is a trait; the
//!   JSON-RPC implementation lives in `ps-04-eth-rpc` and tests supply fakes.

pub mod assets;
pub mod chain;
pub mod entities;
pub mod errors;
pub mod secrets;
/// Scripted chain client for tests.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod time;
pub mod units;

pub use assets::{AssetConfig, AssetTable};
pub use chain::{ChainClient, Receipt, ReceiptStatus, SequenceMode, TransferRequest};
pub use entities::*;
pub use errors::*;
pub use secrets::{address_from_pubkey, redact_endpoint, CredentialKind, SigningSecret};
#[cfg(any(test, feature = "test-utils"))]
pub use testing::ScriptedChain;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use units::{format_units, parse_units, GWEI_DECIMALS};
