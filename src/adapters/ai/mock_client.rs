//! Mock LLM client for testing.
//!
//! Scripted model replies let tests drive the whole tool loop (field
//! collection, escalation, failures) without calling a real model.
//!
//! # Example
//!
//! ```ignore
//! let client = MockLlmClient::new()
//!     .with_reply(ModelReply::tool_call("collect_field", json!({"name": "name", "value": "Juan"})))
//!     .with_text("Gracias, Juan. ¿Cuál es tu correo?");
//!
//! let agent = client.create_agent(blueprint);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use super::tool_loop::{ChatBackend, ModelReply, ToolLoopAgent, TranscriptEntry};
use crate::ports::{AIError, AgentBlueprint, ConversationAgent, LlmClient, ProviderInfo};

/// Mock LLM client.
///
/// Clones share the response queue and the call log, so a test can keep one
/// handle for assertions after giving another to the service.
#[derive(Debug, Clone)]
pub struct MockLlmClient {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<MockCall>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Reply(ModelReply),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
    /// Simulate an unparseable provider response.
    Malformed { message: String },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
            MockError::Malformed { message } => AIError::parse(message),
        }
    }
}

/// One recorded round trip.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub agent_name: String,
    pub instruction: String,
    pub transcript: Vec<TranscriptEntry>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockLlmClient {
    /// Creates a new mock client with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a model reply.
    pub fn with_reply(self, reply: ModelReply) -> Self {
        lock(&self.responses).push_back(MockResponse::Reply(reply));
        self
    }

    /// Queues a plain text reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(ModelReply::text(text))
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a reply on an existing handle.
    pub fn push_reply(&self, reply: ModelReply) {
        lock(&self.responses).push_back(MockResponse::Reply(reply));
    }

    /// Returns the number of round trips made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded round trips.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Reply(ModelReply::text("Mock response")))
    }
}

#[async_trait]
impl ChatBackend for MockLlmClient {
    async fn generate(
        &self,
        blueprint: &AgentBlueprint,
        transcript: &[TranscriptEntry],
    ) -> Result<ModelReply, AIError> {
        lock(&self.calls).push(MockCall {
            agent_name: blueprint.name.clone(),
            instruction: blueprint.instruction.clone(),
            transcript: transcript.to_vec(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Reply(reply) => Ok(reply),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

impl LlmClient for MockLlmClient {
    fn create_agent(&self, blueprint: AgentBlueprint) -> Arc<dyn ConversationAgent> {
        Arc::new(ToolLoopAgent::new(Arc::new(self.clone()), blueprint))
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
