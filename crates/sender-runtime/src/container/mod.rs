//! # Container
//!
//! Runtime configuration and the object graph built from it.

pub mod config;
pub mod subsystems;

pub use config::{load_config, ConfigError, RuntimeConfig};
pub use subsystems::{ConcreteConversation, SenderContainer};
