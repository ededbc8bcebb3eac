//! OpenAI-compatible chat completions client with tool calling.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::http_support::{send_error, status_error, RetryPolicy};
use super::tool_loop::{ChatBackend, ModelReply, ToolLoopAgent, TranscriptEntry};
use crate::domain::intake::tools::ToolCall;
use crate::ports::{AIError, AgentBlueprint, ConversationAgent, LlmClient, ProviderInfo};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIClient {
    /// Creates a new OpenAI client with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts the transcript to OpenAI's message format.
    fn to_openai_request(
        &self,
        blueprint: &AgentBlueprint,
        transcript: &[TranscriptEntry],
    ) -> OpenAIRequest {
        let mut messages = Vec::new();

        if !blueprint.instruction.is_empty() {
            messages.push(OpenAIMessage::text("system", &blueprint.instruction));
        }

        for (index, entry) in transcript.iter().enumerate() {
            match entry {
                TranscriptEntry::User(text) => messages.push(OpenAIMessage::text("user", text)),
                TranscriptEntry::Model(text) => {
                    messages.push(OpenAIMessage::text("assistant", text))
                }
                TranscriptEntry::ToolCall(call) => {
                    let wire = OpenAIToolCall {
                        id: call_id(call.id(), call.name(), index),
                        kind: "function".to_string(),
                        function: OpenAIFunctionCall {
                            name: call.name().to_string(),
                            arguments: call.parameters().to_string(),
                        },
                    };
                    match messages.last_mut() {
                        Some(last) if last.role == "assistant" => {
                            last.tool_calls.get_or_insert_with(Vec::new).push(wire)
                        }
                        _ => messages.push(OpenAIMessage {
                            role: "assistant".to_string(),
                            content: None,
                            tool_calls: Some(vec![wire]),
                            tool_call_id: None,
                        }),
                    }
                }
                TranscriptEntry::ToolResult {
                    call_id: id,
                    name,
                    response,
                } => {
                    let position = transcript[..index]
                        .iter()
                        .rposition(|e| matches!(e, TranscriptEntry::ToolCall(c) if c.name() == name && c.id() == id.as_deref()))
                        .unwrap_or(index);
                    messages.push(OpenAIMessage {
                        role: "tool".to_string(),
                        content: Some(response.to_string()),
                        tool_calls: None,
                        tool_call_id: Some(call_id(id.as_deref(), name, position)),
                    });
                }
            }
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            tools: blueprint.tools.iter().map(|t| t.to_openai_format()).collect(),
            temperature: blueprint.temperature,
        }
    }

    async fn send_once(&self, request: &OpenAIRequest) -> Result<ModelReply, AIError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_body));
        }

        let parsed: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;
        parse_reply(parsed)
    }
}

/// Ids are required on the wire; calls without one get a stable synthetic id.
fn call_id(id: Option<&str>, name: &str, index: usize) -> String {
    id.map(str::to_string)
        .unwrap_or_else(|| format!("call_{}_{}", name, index))
}

fn parse_reply(response: OpenAIResponse) -> Result<ModelReply, AIError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(AIError::content_filtered("content_filter"));
    }

    let mut reply = ModelReply::default();
    if let Some(content) = choice.message.content {
        reply.texts.push(content);
    }
    for call in choice.message.tool_calls.unwrap_or_default() {
        // Unparseable arguments are passed through and rejected by the executor.
        let parameters = serde_json::from_str(&call.function.arguments)
            .unwrap_or(serde_json::Value::String(call.function.arguments));
        reply
            .tool_calls
            .push(ToolCall::new(call.function.name, parameters).with_id(call.id));
    }
    Ok(reply)
}

#[async_trait]
impl ChatBackend for OpenAIClient {
    async fn generate(
        &self,
        blueprint: &AgentBlueprint,
        transcript: &[TranscriptEntry],
    ) -> Result<ModelReply, AIError> {
        let request = self.to_openai_request(blueprint, transcript);
        let request = &request;
        RetryPolicy::new(self.config.max_retries)
            .run(|| self.send_once(request))
            .await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", self.config.model.clone())
    }
}

impl LlmClient for OpenAIClient {
    fn create_agent(&self, blueprint: AgentBlueprint) -> Arc<dyn ConversationAgent> {
        Arc::new(ToolLoopAgent::new(Arc::new(self.clone()), blueprint))
    }

    fn provider_info(&self) -> ProviderInfo {
        ChatBackend::provider_info(self)
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: OpenAIFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}
