//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - the session registry
//! - `LlmClient` / `ConversationAgent` - the model runtime
//! - `ToolExecutor` - applies the agent's tool calls to conversation state

mod conversation_store;
mod llm_client;
mod tool_executor;

pub use conversation_store::{ConversationStore, StoreError};
pub use llm_client::{
    AIError, AgentBlueprint, ConversationAgent, LlmClient, ProviderInfo, DEFAULT_MAX_TOOL_ROUNDS,
};
pub use tool_executor::{ToolExecutionContext, ToolExecutionError, ToolExecutor};
