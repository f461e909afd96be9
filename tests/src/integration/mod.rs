//! Cross-subsystem flows.

#[cfg(test)]
mod support;

pub mod cancellation_flow;
pub mod restart_flow;
pub mod rpc_flow;
pub mod transfer_flow;
