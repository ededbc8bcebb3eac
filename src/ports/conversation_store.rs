//! Conversation Store Port - where conversation state lives.
//!
//! The store is the session registry: one record per conversation id, kept
//! until the process exits. Callers work on owned copies, so a change is
//! visible to others only once it has been written back with `save`.

use async_trait::async_trait;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::ConversationState;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation already exists: {0}")]
    AlreadyExists(ConversationId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for the per-process conversation registry
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Registers a brand-new conversation.
    ///
    /// # Errors
    /// `AlreadyExists` if the id is taken.
    async fn create(&self, state: &ConversationState) -> Result<(), StoreError>;

    /// Returns the stored state, creating a fresh one on first contact.
    async fn get_or_create(&self, id: &ConversationId) -> Result<ConversationState, StoreError>;

    /// Loads an existing conversation.
    ///
    /// # Errors
    /// `NotFound` for ids never seen before.
    async fn load(&self, id: &ConversationId) -> Result<ConversationState, StoreError>;

    /// Writes the state back, replacing the previous record.
    async fn save(&self, state: &ConversationState) -> Result<(), StoreError>;

    /// Check if a conversation exists
    async fn exists(&self, id: &ConversationId) -> Result<bool, StoreError>;

    /// Number of conversations held
    async fn count(&self) -> Result<usize, StoreError>;
}
