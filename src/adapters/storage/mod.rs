//! Storage Adapters
//!
//! Implementations of the `ConversationStore` port.
//!
//! - **InMemoryConversationStore** - process-local registry (the default)

mod in_memory_conversation_store;

pub use in_memory_conversation_store::InMemoryConversationStore;
