//! CreateConversationHandler - Register a new conversation

use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::ConversationState;
use crate::ports::{ConversationStore, StoreError};

/// Command to create a conversation
#[derive(Debug, Clone, Default)]
pub struct CreateConversationCommand {
    /// Caller-chosen id; a UUID is generated when absent
    pub conversation_id: Option<ConversationId>,
}

/// Result of creating a conversation
#[derive(Debug, Clone)]
pub struct CreateConversationResult {
    pub state: ConversationState,
}

/// Error type for creating conversations
#[derive(Debug, thiserror::Error)]
pub enum CreateConversationError {
    #[error("Conversation already exists: {0}")]
    AlreadyExists(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for CreateConversationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => CreateConversationError::AlreadyExists(id),
            other => CreateConversationError::Storage(other.to_string()),
        }
    }
}

/// Handler for creating conversations
pub struct CreateConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl CreateConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateConversationCommand,
    ) -> Result<CreateConversationResult, CreateConversationError> {
        let id = cmd.conversation_id.unwrap_or_default();
        let state = ConversationState::new(id);

        self.store.create(&state).await?;
        tracing::info!(conversation_id = %state.id(), "conversation created");

        Ok(CreateConversationResult { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::intake::ConversationStatus;

    #[tokio::test]
    async fn creates_collecting_conversation() {
        let store = InMemoryConversationStore::new();
        let handler = CreateConversationHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(CreateConversationCommand::default())
            .await
            .unwrap();

        assert_eq!(result.state.status(), ConversationStatus::Collecting);
        assert!(result.state.messages().is_empty());
        assert!(store.exists(result.state.id()).await.unwrap());
    }

    #[tokio::test]
    async fn generated_ids_are_unique() {
        let handler = CreateConversationHandler::new(Arc::new(InMemoryConversationStore::new()));

        let a = handler.handle(CreateConversationCommand::default()).await.unwrap();
        let b = handler.handle(CreateConversationCommand::default()).await.unwrap();

        assert_ne!(a.state.id(), b.state.id());
    }

    #[tokio::test]
    async fn explicit_id_cannot_be_reused() {
        let handler = CreateConversationHandler::new(Arc::new(InMemoryConversationStore::new()));
        let cmd = CreateConversationCommand {
            conversation_id: Some(ConversationId::from_string("session_happy_path")),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await;

        assert!(matches!(
            second,
            Err(CreateConversationError::AlreadyExists(id)) if id.as_str() == "session_happy_path"
        ));
    }
}
