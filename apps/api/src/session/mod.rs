//! Interview session: data contracts, prompt builders, the state machine,
//! and the HTTP handlers that drive it.

pub mod handlers;
pub mod interviewer;
pub mod machine;
pub mod models;
pub mod prompts;
pub mod store;
