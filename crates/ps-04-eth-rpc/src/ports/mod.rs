//! Ports layer for the JSON-RPC client.
//!
//! - Inbound (Driving): `shared_types::ChainClient`, implemented by `EthRpcClient`
//! - Outbound (Driven): `RpcTransport`

pub mod outbound;

pub use outbound::*;
