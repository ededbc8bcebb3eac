//! Tool call and response types.
//!
//! These are the request/response value objects exchanged with the model
//! runtime when it invokes one of the agent's tools.

use serde::{Deserialize, Serialize};

/// A request to invoke a tool.
///
/// Parameters stay as raw JSON until the call is parsed into a typed
/// [`IntakeToolCall`](super::IntakeToolCall).
///
/// # Examples
///
/// ```ignore
/// let call = ToolCall::new(
///     "collect_field",
///     serde_json::json!({ "name": "email", "value": "juan@example.com" }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id, when the provider uses them (OpenAI does)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    /// Name of the tool to invoke
    name: String,

    /// Parameters for the tool (JSON object)
    parameters: serde_json::Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            parameters,
        }
    }

    /// Attaches the provider's call id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns the provider call id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters.
    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }
}

/// Response from executing a tool.
///
/// # Examples
///
/// ```ignore
/// let ok = ToolResponse::success(serde_json::json!({ "status": "collected" }));
/// let failed = ToolResponse::error("Unknown tool: delete_everything");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the tool executed successfully
    success: bool,

    /// Data returned by the tool (if successful)
    data: Option<serde_json::Value>,

    /// Error message (if failed)
    error: Option<String>,
}

impl ToolResponse {
    /// Creates a successful response with data.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Returns whether the tool succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the response data (if any).
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Returns the error message (if any).
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The JSON object handed back to the model as the function result.
    pub fn to_model_payload(&self) -> serde_json::Value {
        match (&self.data, &self.error) {
            (Some(data), _) if self.success => data.clone(),
            (_, Some(error)) => serde_json::json!({ "error": error }),
            _ => serde_json::json!({}),
        }
    }
}
