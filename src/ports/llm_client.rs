//! LLM Client Port - the boundary to the model runtime.
//!
//! An `LlmClient` knows how to stand up a conversational agent from a set of
//! instructions and tool declarations. The resulting `ConversationAgent`
//! runs one user turn at a time: it sees the history, may call tools through
//! the supplied `ToolExecutor`, and returns the text replies to show.
//!
//! # Example
//!
//! ```ignore
//! let agent = client.create_agent(AgentBlueprint::new(AGENT_NAME, instruction, tools));
//! let replies = agent.run_turn(&id, state.messages(), executor.as_ref()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::tools::ToolDefinition;
use crate::domain::intake::ChatMessage;
use crate::ports::ToolExecutor;

/// Upper bound on model/tool round trips in a single turn, unless configured.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 8;

/// Port for creating configured conversational agents.
pub trait LlmClient: Send + Sync {
    /// Builds an agent bound to the given instructions and tools.
    fn create_agent(&self, blueprint: AgentBlueprint) -> Arc<dyn ConversationAgent>;

    /// Get provider information.
    fn provider_info(&self) -> ProviderInfo;
}

/// One configured agent.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Runs one user turn.
    ///
    /// `history` already ends with the user's newest message. Returns the
    /// non-empty text replies in the order the model produced them.
    async fn run_turn(
        &self,
        conversation_id: &ConversationId,
        history: &[ChatMessage],
        tools: &dyn ToolExecutor,
    ) -> Result<Vec<String>, AIError>;
}

/// Everything needed to create an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentBlueprint {
    pub name: String,
    pub instruction: String,
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
    pub max_tool_rounds: u32,
}

impl AgentBlueprint {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            tools,
            temperature: None,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: u32) -> Self {
        self.max_tool_rounds = rounds;
        self
    }
}

/// Provider information and capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "openai").
    pub name: String,
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Whether function/tool calling is supported.
    pub supports_functions: bool,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            supports_functions: true,
        }
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider selected but not configured (usually a missing API key).
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// The model kept calling tools past the configured limit.
    #[error("tool loop exceeded {rounds} rounds")]
    ToolLoopExceeded {
        /// Configured limit.
        rounds: u32,
    },

    /// A tool could not be applied because of an infrastructure failure.
    #[error("tool execution failed: {0}")]
    ToolFailed(String),
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
