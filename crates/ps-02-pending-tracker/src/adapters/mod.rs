//! Pending-set storage adapters

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonFilePendingStore;
pub use memory_store::InMemoryPendingStore;
