//! Domain module for the conversation subsystem
//!
//! - validation: field rules
//! - session: per-identity session and typed stage data
//! - store: session map with expiry
//! - machine: transition table

pub mod machine;
pub mod session;
pub mod store;
pub mod validation;

pub use machine::{transition_for, Field, Input, StateMachine, Transition, TRANSITIONS};
pub use session::{Credentials, Session, SessionState, Stage, TransferDraft};
pub use store::SessionStore;
pub use validation::ValidationRules;
