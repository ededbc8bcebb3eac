//! Google Gemini client (REST `generateContent` with function calling).

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

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_once(&self, request: &GeminiRequest) -> Result<ModelReply, AIError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(status_error(status, body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AIError::parse(format!("Failed to parse Gemini response: {}", e)))?;
        parse_reply(parsed)
    }
}

/// Converts the transcript into Gemini `contents`, merging consecutive parts
/// from the same side into one turn.
fn build_request(blueprint: &AgentBlueprint, transcript: &[TranscriptEntry]) -> GeminiRequest {
    let mut contents: Vec<GeminiContent> = Vec::new();

    for entry in transcript {
        let (role, part) = match entry {
            TranscriptEntry::User(text) => ("user", GeminiPart::Text { text: text.clone() }),
            TranscriptEntry::Model(text) => ("model", GeminiPart::Text { text: text.clone() }),
            TranscriptEntry::ToolCall(call) => (
                "model",
                GeminiPart::FunctionCall {
                    function_call: GeminiFunctionCall {
                        name: call.name().to_string(),
                        args: call.parameters().clone(),
                    },
                },
            ),
            TranscriptEntry::ToolResult { name, response, .. } => (
                "user",
                GeminiPart::FunctionResponse {
                    function_response: GeminiFunctionResponse {
                        name: name.clone(),
                        response: response.clone(),
                    },
                },
            ),
        };

        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => contents.push(GeminiContent {
                role: Some(role.to_string()),
                parts: vec![part],
            }),
        }
    }

    let tools = if blueprint.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: blueprint.tools.iter().map(|t| t.to_gemini_format()).collect(),
        }]
    };

    GeminiRequest {
        contents,
        system_instruction: (!blueprint.instruction.is_empty()).then(|| GeminiContent {
            role: None,
            parts: vec![GeminiPart::Text {
                text: blueprint.instruction.clone(),
            }],
        }),
        tools,
        generation_config: blueprint.temperature.map(|temperature| GeminiGenerationConfig {
            temperature: Some(temperature),
        }),
    }
}

fn parse_reply(response: GeminiResponse) -> Result<ModelReply, AIError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => AIError::content_filtered(reason),
            None => AIError::parse("No candidates in Gemini response"),
        });
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if matches!(reason, "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII") {
                return Err(AIError::content_filtered(reason));
            }
        }
    }

    let mut reply = ModelReply::default();
    for part in parts {
        match part {
            GeminiPart::Text { text } => reply.texts.push(text),
            GeminiPart::FunctionCall { function_call } => reply
                .tool_calls
                .push(ToolCall::new(function_call.name, function_call.args)),
            GeminiPart::FunctionResponse { .. } | GeminiPart::Other(_) => {}
        }
    }
    Ok(reply)
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn generate(
        &self,
        blueprint: &AgentBlueprint,
        transcript: &[TranscriptEntry],
    ) -> Result<ModelReply, AIError> {
        let request = build_request(blueprint, transcript);
        let request = &request;
        RetryPolicy::new(self.config.max_retries)
            .run(|| self.send_once(request))
            .await
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", self.config.model.clone())
    }
}

impl LlmClient for GeminiClient {
    fn create_agent(&self, blueprint: AgentBlueprint) -> Arc<dyn ConversationAgent> {
        Arc::new(ToolLoopAgent::new(Arc::new(self.clone()), blueprint))
    }

    fn provider_info(&self) -> ProviderInfo {
        ChatBackend::provider_info(self)
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: GeminiFunctionCall,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: GeminiFunctionResponse,
    },
    /// Part kinds this client does not use (inline data, code execution, ...)
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tools::intake_tool_definitions;
    use serde_json::json;

    fn blueprint() -> AgentBlueprint {
        AgentBlueprint::new("customer_support_agent", "You are Kora.", intake_tool_definitions())
            .with_temperature(0.1)
    }

    fn parse(body: serde_json::Value) -> Result<ModelReply, AIError> {
        parse_reply(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:9999/v1beta/")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        let client = GeminiClient::new(config).unwrap();

        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-pro:generateContent"
        );
        assert_eq!(LlmClient::provider_info(&client).name, "gemini");
    }

    #[test]
    fn request_carries_instruction_tools_and_temperature() {
        let request = build_request(&blueprint(), &[TranscriptEntry::User("Hola".into())]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are Kora.");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hola");
        let declarations = &json["tools"][0]["functionDeclarations"];
        assert_eq!(declarations[0]["name"], "collect_field");
        assert_eq!(declarations[1]["name"], "escalate_conversation");
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn tool_round_trip_is_grouped_by_role() {
        let transcript = vec![
            TranscriptEntry::User("Juan".into()),
            TranscriptEntry::Model("Anotado.".into()),
            TranscriptEntry::ToolCall(ToolCall::new(
                "collect_field",
                json!({"name": "name", "value": "Juan"}),
            )),
            TranscriptEntry::ToolResult {
                call_id: None,
                name: "collect_field".into(),
                response: json!({"status": "collected"}),
            },
        ];
        let json = serde_json::to_value(build_request(&blueprint(), &transcript)).unwrap();
        let contents = json["contents"].as_array().unwrap();

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Anotado.");
        assert_eq!(contents[1]["parts"][1]["functionCall"]["name"], "collect_field");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(
            contents[2]["parts"][0]["functionResponse"]["response"]["status"],
            "collected"
        );
    }

    #[test]
    fn parses_text_and_function_calls() {
        let reply = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Gracias"},
                        {"functionCall": {"name": "collect_field", "args": {"name": "email", "value": "a@b.c"}}}
                    ]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        }))
        .unwrap();

        assert_eq!(reply.texts, vec!["Gracias"]);
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name(), "collect_field");
        assert_eq!(reply.tool_calls[0].parameters()["value"], "a@b.c");
    }

    #[test]
    fn unknown_part_kinds_are_ignored() {
        let reply = parse(json!({
            "candidates": [{
                "content": {"parts": [{"executableCode": {"code": "print(1)"}}, {"text": "ok"}]}
            }]
        }))
        .unwrap();
        assert_eq!(reply.texts, vec!["ok"]);
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let err = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { ref reason } if reason == "SAFETY"));
    }

    #[test]
    fn empty_safety_candidate_is_content_filtered() {
        let err = parse(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { .. }));
    }

    #[test]
    fn no_candidates_is_parse_error() {
        assert!(matches!(parse(json!({})), Err(AIError::Parse(_))));
    }
}
