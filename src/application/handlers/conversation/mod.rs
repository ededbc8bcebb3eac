//! Conversation command and query handlers.
//!
//! Creating conversations, running user turns, and reading state back.

mod create_conversation;
mod get_conversation;
mod send_message;

pub use create_conversation::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    CreateConversationResult,
};
pub use get_conversation::{GetConversationError, GetConversationHandler, GetConversationQuery};
pub use send_message::{
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
};
