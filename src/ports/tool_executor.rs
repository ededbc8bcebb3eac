//! Tool Executor Port - Interface for executing the agent's tools.
//!
//! The model runtime hands every tool call it receives to a `ToolExecutor`.
//! Implementations parse the call, apply it to conversation state, and
//! return the JSON the model sees as the function result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::tools::{ToolCall, ToolCallError, ToolDefinition, ToolResponse};

/// Port for executing agent tools.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool and return the result.
    ///
    /// # Returns
    ///
    /// * `Ok(ToolResponse)` - Tool executed
    /// * `Err(ToolExecutionError::InvalidCall)` - Rejected before touching state
    /// * `Err(ToolExecutionError::SystemError)` - Storage failed
    async fn execute(
        &self,
        call: ToolCall,
        context: ToolExecutionContext,
    ) -> Result<ToolResponse, ToolExecutionError>;

    /// Declarations of every tool this executor accepts.
    fn available_tools(&self) -> Vec<ToolDefinition>;

    /// Validate a call without executing it.
    fn validate(&self, call: &ToolCall) -> Result<(), ToolCallError>;

    /// Check if a tool exists.
    fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }

    /// Get a tool definition by name.
    fn get_tool(&self, name: &str) -> Option<ToolDefinition> {
        self.available_tools().into_iter().find(|t| t.name() == name)
    }
}

/// Context for tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolExecutionContext {
    /// Conversation the call belongs to
    pub conversation_id: ConversationId,

    /// Tool round within the current turn, starting at 1 (for audit logging)
    pub round: u32,
}

impl ToolExecutionContext {
    /// Creates a new execution context.
    pub fn new(conversation_id: ConversationId, round: u32) -> Self {
        Self {
            conversation_id,
            round,
        }
    }
}

/// Errors that can occur during tool execution.
#[derive(Debug, Clone, Error)]
pub enum ToolExecutionError {
    /// Unknown tool or malformed arguments
    #[error("Invalid tool call: {0}")]
    InvalidCall(#[from] ToolCallError),

    /// Infrastructure/system error
    #[error("System error: {0}")]
    SystemError(String),
}

impl ToolExecutionError {
    /// Creates a system error.
    pub fn system(message: impl Into<String>) -> Self {
        Self::SystemError(message.into())
    }
}
