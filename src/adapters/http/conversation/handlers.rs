//! HTTP handlers for conversation endpoints
//!
//! These handlers connect Axum routes to the application layer.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::str::FromStr;

use crate::application::{
    CreateConversationError, GetConversationError, IntakeService, SendMessageError,
};
use crate::domain::foundation::ConversationId;

use super::dto::{
    ChatHistoryResponse, ConversationStateResponse, CreateConversationResponse, ErrorResponse,
    MessageDto, SendMessageRequest,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct ConversationAppState {
    pub service: IntakeService,
}

impl ConversationAppState {
    pub fn new(service: IntakeService) -> Self {
        Self { service }
    }
}

/// A blank path id can never name a stored conversation, so it is a 404.
fn parse_id(raw: &str) -> Result<ConversationId, ApiError> {
    ConversationId::from_str(raw).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Conversation", raw)),
        )
    })
}

fn not_found(id: &ConversationId) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::not_found("Conversation", id.as_str())),
    )
}

fn get_error(err: GetConversationError) -> ApiError {
    match err {
        GetConversationError::NotFound(id) => not_found(&id),
        GetConversationError::Storage(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(msg)),
        ),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Create a new conversation
///
/// POST /conversations/
pub async fn create_conversation(
    State(app_state): State<ConversationAppState>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let result = app_state
        .service
        .create_conversation(None)
        .await
        .map_err(|e| match e {
            CreateConversationError::AlreadyExists(_) => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::conflict(e.to_string())),
            ),
            CreateConversationError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(msg)),
            ),
        })?;

    let response = CreateConversationResponse {
        conversation_id: result.state.id().to_string(),
    };

    Ok::<_, ApiError>((StatusCode::OK, Json(response)))
}

/// Send a message and run one agent turn
///
/// POST /conversations/:id/messages/
pub async fn send_message(
    State(app_state): State<ConversationAppState>,
    Path(conversation_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let conversation_id = parse_id(&conversation_id)?;

    let result = app_state
        .service
        .send_message(conversation_id, req.text)
        .await
        .map_err(|e| match e {
            SendMessageError::NotFound(id) => not_found(&id),
            SendMessageError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(msg)),
            ),
            SendMessageError::Agent(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(e.to_string())),
            ),
        })?;

    let response: Vec<MessageDto> = result.replies.iter().map(MessageDto::from).collect();

    Ok::<_, ApiError>((StatusCode::OK, Json(response)))
}

/// Get the chat history of a conversation
///
/// GET /conversations/:id/messages/
pub async fn get_messages(
    State(app_state): State<ConversationAppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let conversation_id = parse_id(&conversation_id)?;

    let state = app_state
        .service
        .get_conversation(conversation_id)
        .await
        .map_err(get_error)?;

    Ok::<_, ApiError>((StatusCode::OK, Json(ChatHistoryResponse::from(&state))))
}

/// Get the full state of a conversation
///
/// GET /conversations/:id
pub async fn get_conversation(
    State(app_state): State<ConversationAppState>,
    Path(conversation_id): Path<String>,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let conversation_id = parse_id(&conversation_id)?;

    let state = app_state
        .service
        .get_conversation(conversation_id)
        .await
        .map_err(get_error)?;

    Ok::<_, ApiError>((
        StatusCode::OK,
        Json(ConversationStateResponse::from(&state)),
    ))
}
