//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM clients (Gemini, OpenAI, mock) and the tool loop
//! - `storage` - conversation store implementations
//! - `tools` - tool executor applying the agent's calls to stored state
//! - `http` - axum REST API

pub mod ai;
pub mod http;
pub mod storage;
pub mod tools;

pub use ai::{client_from_config, GeminiClient, MockLlmClient, OpenAIClient};
pub use http::{app_router, ConversationAppState};
pub use storage::InMemoryConversationStore;
pub use tools::IntakeToolExecutor;
