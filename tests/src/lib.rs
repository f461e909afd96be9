//! # Pending-Sender Test Suite
//!
//! End-to-end flows driven through the runtime's command dispatcher, with
//! scripted chains standing in for the network.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── support.rs            # Operator harness and fixtures
//!     ├── transfer_flow.rs      # dialogue → broadcast → reconcile
//!     ├── cancellation_flow.rs  # /cancel_pending and fee escalation
//!     ├── restart_flow.rs       # JSON vault and pending sets across restarts
//!     └── rpc_flow.rs           # real signing over a fake JSON-RPC node
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ps-tests
//! cargo test -p ps-tests integration::cancellation_flow::
//!
//! # Benchmarks
//! cargo bench -p ps-tests
//! ```

#![allow(dead_code)]

pub mod integration;
