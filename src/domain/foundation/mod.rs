//! Foundation module - Shared domain primitives.
//!
//! Identifiers, validation errors and the state machine contract used by the
//! intake domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::ConversationId;
pub use state_machine::StateMachine;
