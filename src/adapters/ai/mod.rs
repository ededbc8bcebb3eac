//! LLM Client Adapters.
//!
//! Implementations of the `LlmClient` port.
//!
//! ## Available Adapters
//!
//! - `GeminiClient` - Google Gemini (`generateContent` REST API)
//! - `OpenAIClient` - OpenAI and compatible chat completions APIs
//! - `MockLlmClient` - Scripted replies for testing
//!
//! All of them run turns through [`ToolLoopAgent`], which executes tool
//! calls and feeds their results back to the model.

mod factory;
mod gemini_client;
mod http_support;
mod mock_client;
mod openai_client;
mod tool_loop;

pub use factory::client_from_config;
pub use gemini_client::{GeminiClient, GeminiConfig};
pub use mock_client::{MockCall, MockError, MockLlmClient, MockResponse};
pub use openai_client::{OpenAIClient, OpenAIConfig};
pub use tool_loop::{ChatBackend, ModelReply, ToolLoopAgent, TranscriptEntry};
