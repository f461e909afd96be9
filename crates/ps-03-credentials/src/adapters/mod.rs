//! Credential vault adapters

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileVault;
pub use memory::InMemoryVault;
