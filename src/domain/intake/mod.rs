//! Intake domain - collecting configured fields through conversation.

mod instructions;
mod message;
mod persona;
mod schema;
mod state;
mod status;
pub mod tools;

pub use instructions::{AgentInstructions, AGENT_NAME};
pub use message::{ChatMessage, ChatRole};
pub use persona::{EscalationPolicy, Persona};
pub use schema::{normalize_field_name, FieldSchema, FieldSpec};
pub use state::ConversationState;
pub use status::ConversationStatus;
