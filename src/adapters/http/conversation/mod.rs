//! HTTP adapter for the conversation API.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatHistoryResponse, ConversationStateResponse, CreateConversationResponse, ErrorResponse,
    MessageDto, SendMessageRequest,
};
pub use handlers::ConversationAppState;
pub use routes::{conversation_router, routes};
