//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, validation errors, state machine)
//! - `intake` - Conversation state, field schema, persona and the agent's tools

pub mod foundation;
pub mod intake;
