//! GetConversationHandler - Query handler for conversation state.

use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::ConversationState;
use crate::ports::{ConversationStore, StoreError};

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

/// Error type for conversation queries
#[derive(Debug, thiserror::Error)]
pub enum GetConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for GetConversationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GetConversationError::NotFound(id),
            other => GetConversationError::Storage(other.to_string()),
        }
    }
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Unknown ids are `NotFound`; queries never create conversations.
    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<ConversationState, GetConversationError> {
        Ok(self.store.load(&query.conversation_id).await?)
    }
}
