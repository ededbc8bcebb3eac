//! Route definitions for conversation endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_conversation, get_conversation, get_messages, send_message, ConversationAppState,
};

/// Create conversation router with all endpoints
///
/// # Endpoints
///
/// - `POST /conversations/` - Create conversation
/// - `POST /conversations/:id/messages/` - Send message, run one agent turn
/// - `GET /conversations/:id/messages/` - Chat history
/// - `GET /conversations/:id` - Full conversation state
///
/// Every path is also served without its trailing slash (and
/// `/conversations/:id/` with one).
pub fn routes() -> Router<ConversationAppState> {
    Router::new()
        .route("/conversations/", post(create_conversation))
        .route("/conversations", post(create_conversation))
        .route(
            "/conversations/:id/messages/",
            post(send_message).get(get_messages),
        )
        .route(
            "/conversations/:id/messages",
            post(send_message).get(get_messages),
        )
        .route("/conversations/:id", get(get_conversation))
        .route("/conversations/:id/", get(get_conversation))
}

/// Conversation router bound to its state.
pub fn conversation_router(state: ConversationAppState) -> Router {
    routes().with_state(state)
}
