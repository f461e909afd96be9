//! Ports layer for the credential vault.
//!
//! - Outbound (Driven): `CredentialVault`
//! - The inbound surface is `CredentialAdapter` itself.

pub mod outbound;

pub use outbound::*;
