//! The two state mutations the agent can trigger.
//!
//! Neither operation fails: arguments are validated when the tool call is
//! parsed, before anything here runs.

use serde::{Deserialize, Serialize};

use crate::domain::intake::{ConversationState, FieldSchema};

/// Literal `status` reported back to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolOutcome {
    Collected,
    Escalated,
}

/// Result of recording one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResult {
    pub status: ToolOutcome,
    /// Normalized field name.
    pub field: String,
    pub value: String,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}

/// Result of handing the conversation to a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationResult {
    pub status: ToolOutcome,
    pub reason: String,
    pub summary: String,
    pub ticket_id: String,
}

/// Upserts `value` under the normalized `name` and reports progress.
///
/// `missing_fields` is presence-only while `is_complete` also requires a
/// non-empty value, so a blank answer is neither missing nor complete.
pub fn collect_field(
    state: &mut ConversationState,
    schema: &FieldSchema,
    name: &str,
    value: &str,
) -> CollectionResult {
    let field = state.record_field(name, value);
    let required = schema.required_names();

    CollectionResult {
        status: ToolOutcome::Collected,
        field,
        value: value.to_string(),
        is_complete: state.is_complete(&required),
        missing_fields: state.missing_fields(&required),
    }
}

/// Marks the conversation escalated, whatever its current status.
pub fn escalate(state: &mut ConversationState, reason: &str, summary: &str) -> EscalationResult {
    state.escalate(reason, summary);

    EscalationResult {
        status: ToolOutcome::Escalated,
        reason: reason.to_string(),
        summary: summary.to_string(),
        ticket_id: state.ticket_id(),
    }
}
