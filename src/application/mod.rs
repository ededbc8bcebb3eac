//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (create, send message) and queries (get conversation) each have
//! their own handler; [`IntakeService`] wires them to shared ports.

pub mod evaluation;
pub mod handlers;
mod service;
mod turn_gate;

pub use handlers::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    CreateConversationResult, GetConversationError, GetConversationHandler, GetConversationQuery,
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
};
pub use service::IntakeService;
pub use turn_gate::{TurnGate, TurnPermit};
