//! # ps-04-eth-rpc
//!
//! `ChainClient` over an Ethereum JSON-RPC endpoint, bound to one signing
//! key.
//!
//! ## Methods used
//!
//! | Capability | JSON-RPC |
//! |---|---|
//! | `sequence_count` | `eth_getTransactionCount(address, latest \| pending)` |
//! | `fee_estimate` | `eth_gasPrice` |
//! | `receipt` | `eth_getTransactionReceipt` |
//! | `broadcast` | `eth_sendRawTransaction` |
//! | `wait_for_confirmation` | `eth_getTransactionReceipt` + `eth_blockNumber`, polled |
//!
//! Transfers are signed locally as legacy EIP-155 transactions.
//!
//! ## Module Structure
//!
//! ```text
//! domain/quantity.rs     - hex quantity encoding
//! domain/transaction.rs  - legacy transaction, signing hash, raw encoding
//! domain/erc20.rs        - transfer(address,uint256) calldata
//! ports/outbound.rs      - RpcTransport
//! adapters/http.rs       - reqwest transport
//! client.rs              - EthRpcClient
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;

pub use adapters::HttpTransport;
pub use client::EthRpcClient;
pub use config::ChainConfig;
pub use domain::{erc20_transfer_calldata, LegacyTransaction, SignedTransaction};
pub use ports::outbound::RpcTransport;
