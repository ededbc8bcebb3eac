//! Request and response bodies for the conversation endpoints.
//!
//! All keys are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::intake::{ChatMessage, ChatRole, ConversationState, ConversationStatus};

/// POST /conversations/
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationResponse {
    pub conversation_id: String,
}

/// POST /conversations/:id/messages/
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// One chat message as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub role: ChatRole,
    pub text: String,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// GET /conversations/:id/messages/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<MessageDto>,
}

impl From<&ConversationState> for ChatHistoryResponse {
    fn from(state: &ConversationState) -> Self {
        Self {
            messages: state.messages().iter().map(MessageDto::from).collect(),
        }
    }
}

/// GET /conversations/:id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStateResponse {
    pub conversation_id: String,
    pub status: ConversationStatus,
    /// Sorted by field name so responses are stable.
    pub collected_fields: BTreeMap<String, String>,
    pub summary: Option<String>,
    pub messages: Vec<MessageDto>,
}

impl From<&ConversationState> for ConversationStateResponse {
    fn from(state: &ConversationState) -> Self {
        Self {
            conversation_id: state.id().to_string(),
            status: state.status(),
            collected_fields: state
                .collected_fields()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            summary: state.summary().map(str::to_string),
            messages: state.messages().iter().map(MessageDto::from).collect(),
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ConversationId;

    #[test]
    fn state_response_uses_camel_case() {
        let mut state = ConversationState::new(ConversationId::from_string("c1"));
        state.record_field("Email", "a@b.c");
        state.add_message(ChatRole::User, "Hola");

        let json = serde_json::to_value(ConversationStateResponse::from(&state)).unwrap();

        assert_eq!(json["conversationId"], "c1");
        assert_eq!(json["status"], "COLLECTING");
        assert_eq!(json["collectedFields"]["email"], "a@b.c");
        assert!(json["summary"].is_null());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["text"], "Hola");
    }

    #[test]
    fn create_response_serializes_id() {
        let json = serde_json::to_string(&CreateConversationResponse {
            conversation_id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"conversationId":"abc"}"#);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let error = ErrorResponse::not_found("Conversation", "c9");
        let json = serde_json::to_string(&error).unwrap();

        assert!(json.contains("NOT_FOUND"));
        assert!(json.contains("Conversation not found: c9"));
        assert!(!json.contains("details"));
    }
}
