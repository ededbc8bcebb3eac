//! Per-conversation intake record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::message::{ChatMessage, ChatRole};
use super::schema::normalize_field_name;
use super::status::ConversationStatus;
use crate::domain::foundation::{ConversationId, StateMachine};

/// Everything known about one conversation.
///
/// Field keys are stored normalized and are not checked against the schema.
/// The message history only ever grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    id: ConversationId,
    status: ConversationStatus,
    collected_fields: HashMap<String, String>,
    summary: Option<String>,
    messages: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Creates a fresh conversation in `Collecting`.
    pub fn new(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: ConversationStatus::Collecting,
            collected_fields: HashMap::new(),
            summary: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn status(&self) -> ConversationStatus {
        self.status
    }

    pub fn collected_fields(&self) -> &HashMap<String, String> {
        &self.collected_fields
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the value recorded for a field, looked up case-insensitively.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.collected_fields
            .get(&normalize_field_name(name))
            .map(String::as_str)
    }

    /// Upserts a field value and returns the normalized key it was stored under.
    pub fn record_field(&mut self, name: &str, value: impl Into<String>) -> String {
        let key = normalize_field_name(name);
        self.collected_fields.insert(key.clone(), value.into());
        self.touch();
        key
    }

    /// Required names with no recorded key, in the order given.
    ///
    /// Presence only: a field recorded with an empty value is not missing,
    /// even though it does not count towards completion.
    pub fn missing_fields(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|name| !self.collected_fields.contains_key(&normalize_field_name(name)))
            .cloned()
            .collect()
    }

    /// True once every required field has a non-empty value, or the
    /// conversation has already left `Collecting`.
    pub fn is_complete(&self, required: &[String]) -> bool {
        if self.status.is_terminal() {
            return true;
        }
        required
            .iter()
            .all(|name| self.field(name).is_some_and(|value| !value.is_empty()))
    }

    /// Hands the conversation to a human.
    ///
    /// Accepted from any status; a repeated escalation overwrites the summary.
    pub fn escalate(&mut self, reason: &str, summary: &str) {
        self.status = self
            .status
            .transition_to(ConversationStatus::Escalated)
            .unwrap_or(ConversationStatus::Escalated);
        self.summary = Some(format!("Escalated due to: {}. Summary: {}", reason, summary));
        self.touch();
    }

    /// Ticket reference handed to the human team on escalation.
    pub fn ticket_id(&self) -> String {
        format!("support-ticket-{}", self.id)
    }

    /// Appends a message to the history.
    pub fn add_message(&mut self, role: ChatRole, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            text: text.into(),
        });
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
