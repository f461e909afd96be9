//! # Sender Runtime Library
//!
//! Wiring for the pending-sender executable, exposed for the end-to-end
//! tests. The entry point is the `main.rs` binary.
//!
//! ## Module Structure
//!
//! ```text
//! sender-runtime/
//! ├── container/   # RuntimeConfig (PS_* env) and the SenderContainer graph
//! ├── adapters/    # ChainBroadcaster, tracker registry, vault source, console
//! ├── handlers/    # CommandDispatcher and the ReconcileLoop timer
//! └── testing      # StaticChainFactory for offline tests (`test-utils`)
//! ```
//!
//! ## Event Flow
//!
//! ```text
//! console line ─► parse_line ─► CommandDispatcher ─┬─► ConversationService
//!                                                  └─► /status /history
//!                                                      /cancel_pending /clear
//! ReconcileLoop (every reconcile_interval_secs) ─► trackers ─► ConsoleSink
//! ```

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod handlers;

/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use container::{load_config, RuntimeConfig, SenderContainer};
pub use handlers::{CancellationTasks, CommandDispatcher, Dispatch, ReconcileLoop};
