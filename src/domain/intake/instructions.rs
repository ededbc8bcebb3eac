//! System instruction rendered for the intake agent.

use std::fmt::Write;

use super::persona::{EscalationPolicy, Persona};
use super::schema::FieldSchema;
use super::tools::{COLLECT_FIELD, ESCALATE_CONVERSATION};

/// Name the agent is registered under with the model runtime.
pub const AGENT_NAME: &str = "customer_support_agent";

/// Renders the agent's instructions from persona, fields and escalation policy.
#[derive(Debug, Clone, Copy)]
pub struct AgentInstructions<'a> {
    persona: &'a Persona,
    fields: &'a FieldSchema,
    escalation: &'a EscalationPolicy,
}

impl<'a> AgentInstructions<'a> {
    pub fn new(
        persona: &'a Persona,
        fields: &'a FieldSchema,
        escalation: &'a EscalationPolicy,
    ) -> Self {
        Self {
            persona,
            fields,
            escalation,
        }
    }

    pub fn render(&self) -> String {
        let persona = self.persona;
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "You are {}, {} at {}.",
            persona.name, persona.title, persona.company_name
        );
        let _ = writeln!(out, "Personality: {}", persona.personality);
        let _ = writeln!(out);
        let _ = writeln!(out, "Your goal is to collect the following user information:");
        for field in self.fields.fields() {
            let marker = if field.required { "required" } else { "optional" };
            let _ = write!(out, "- {} ({}): {}", field.name, marker, field.description);
            if let Some(pattern) = &field.validation_regex {
                let _ = write!(out, " [expected format: {}]", pattern);
            }
            let _ = writeln!(out);
        }
        let required = self.fields.required_names();
        if !required.is_empty() {
            let _ = writeln!(out, "Required fields: {}", required.join(", "));
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Rules:");
        let mut rules = vec![
            "Only ask for ONE missing field at a time.".to_string(),
            format!("Call the '{}' tool when the user provides a field value.", COLLECT_FIELD),
            format!(
                "The '{}' tool will tell you which fields are still missing (missingFields). Use that to decide what to ask next.",
                COLLECT_FIELD
            ),
            format!(
                "If the '{}' tool returns isComplete: true, call '{}' immediately.",
                COLLECT_FIELD, ESCALATE_CONVERSATION
            ),
        ];
        if self.escalation.enabled && !self.escalation.triggers.is_empty() {
            rules.push(format!(
                "If the user mentions an escalation trigger (e.g. {}), call '{}' immediately.",
                self.escalation.triggers.join(", "),
                ESCALATE_CONVERSATION
            ));
        }
        rules.push(format!(
            "Main greeting to use at start: \"{}\"",
            persona.greeting()
        ));
        rules.push(
            "Make small talk if the user asks unrelated questions, then pivot back to collection."
                .to_string(),
        );
        rules.push("Do not make up info.".to_string());

        for (index, rule) in rules.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", index + 1, rule);
        }
        out
    }
}
