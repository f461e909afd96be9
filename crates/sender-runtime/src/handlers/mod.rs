//! # Handlers
//!
//! Inbound event routing and the periodic reconcile task.

pub mod commands;
pub mod reconcile;

pub use commands::{CancellationTasks, CommandDispatcher, Dispatch};
pub use reconcile::ReconcileLoop;
