//! Command and query handlers.
//!
//! Each handler takes its ports as `Arc<dyn Trait>` and exposes one
//! `handle` method.

pub mod conversation;

pub use conversation::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    CreateConversationResult, GetConversationError, GetConversationHandler, GetConversationQuery,
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
};
