//! Tools the intake agent can call.
//!
//! The model names a tool and passes JSON arguments. [`IntakeToolCall`] is the
//! closed set of calls this service understands; parsing a raw [`ToolCall`]
//! into it is the only place arguments are checked.

mod mutators;
mod tool_call;
mod tool_definition;

pub use mutators::{collect_field, escalate, CollectionResult, EscalationResult, ToolOutcome};
pub use tool_call::{ToolCall, ToolResponse};
pub use tool_definition::ToolDefinition;

use serde::Deserialize;
use thiserror::Error;

use super::{ConversationState, FieldSchema};

/// Tool that records one field value.
pub const COLLECT_FIELD: &str = "collect_field";

/// Tool that hands the conversation to a human.
pub const ESCALATE_CONVERSATION: &str = "escalate_conversation";

/// Why a raw tool call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct CollectFieldArgs {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct EscalateArgs {
    reason: String,
    summary: String,
}

/// A validated call to one of the intake tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeToolCall {
    CollectField { name: String, value: String },
    Escalate { reason: String, summary: String },
}

impl IntakeToolCall {
    /// Parses a raw call, rejecting unknown names and missing or non-string arguments.
    pub fn parse(call: &ToolCall) -> Result<Self, ToolCallError> {
        match call.name() {
            COLLECT_FIELD => {
                let args: CollectFieldArgs = parse_args(call)?;
                Ok(IntakeToolCall::CollectField {
                    name: args.name,
                    value: args.value,
                })
            }
            ESCALATE_CONVERSATION => {
                let args: EscalateArgs = parse_args(call)?;
                Ok(IntakeToolCall::Escalate {
                    reason: args.reason,
                    summary: args.summary,
                })
            }
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            IntakeToolCall::CollectField { .. } => COLLECT_FIELD,
            IntakeToolCall::Escalate { .. } => ESCALATE_CONVERSATION,
        }
    }

    /// Applies the call to the state and returns the model-facing result.
    pub fn apply(&self, state: &mut ConversationState, schema: &FieldSchema) -> serde_json::Value {
        let result = match self {
            IntakeToolCall::CollectField { name, value } => {
                serde_json::to_value(collect_field(state, schema, name, value))
            }
            IntakeToolCall::Escalate { reason, summary } => {
                serde_json::to_value(escalate(state, reason, summary))
            }
        };
        // Both result types are plain structs of strings, bools and lists.
        result.unwrap_or(serde_json::Value::Null)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(call: &ToolCall) -> Result<T, ToolCallError> {
    serde_json::from_value(call.parameters().clone()).map_err(|e| ToolCallError::InvalidArguments {
        tool: call.name().to_string(),
        reason: e.to_string(),
    })
}

/// Declarations for both intake tools.
pub fn intake_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            COLLECT_FIELD,
            "Collects a specific piece of user information. Returns which required fields are still missing and whether collection is complete.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the field being collected" },
                    "value": { "type": "string", "description": "Value the user provided" }
                },
                "required": ["name", "value"]
            }),
        ),
        ToolDefinition::new(
            ESCALATE_CONVERSATION,
            "Escalates the conversation to a human agent.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "reason": { "type": "string", "description": "Why the conversation is being escalated" },
                    "summary": { "type": "string", "description": "Short summary of the conversation and collected data" }
                },
                "required": ["reason", "summary"]
            }),
        ),
    ]
}
