//! In-Memory Conversation Store Adapter
//!
//! Process-wide registry of conversations. Nothing is evicted and nothing
//! survives a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::ConversationState;
use crate::ports::{ConversationStore, StoreError};

/// In-memory conversation registry
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<HashMap<ConversationId, ConversationState>>>,
}

impl InMemoryConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.states.write().await.clear();
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, state: &ConversationState) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        if states.contains_key(state.id()) {
            return Err(StoreError::AlreadyExists(state.id().clone()));
        }
        states.insert(state.id().clone(), state.clone());
        Ok(())
    }

    async fn get_or_create(&self, id: &ConversationId) -> Result<ConversationState, StoreError> {
        let mut states = self.states.write().await;
        let state = states.entry(id.clone()).or_insert_with(|| {
            tracing::debug!(conversation_id = %id, "registering conversation on first contact");
            ConversationState::new(id.clone())
        });
        Ok(state.clone())
    }

    async fn load(&self, id: &ConversationId) -> Result<ConversationState, StoreError> {
        let states = self.states.read().await;
        states
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn save(&self, state: &ConversationState) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        states.insert(state.id().clone(), state.clone());
        Ok(())
    }

    async fn exists(&self, id: &ConversationId) -> Result<bool, StoreError> {
        let states = self.states.read().await;
        Ok(states.contains_key(id))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.states.read().await.len())
    }
}
