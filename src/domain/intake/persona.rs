//! Who the agent is and when it hands off.

use serde::{Deserialize, Serialize};

/// The agent's presented identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub name: String,
    pub title: String,
    pub personality: String,
    pub company_name: String,
    /// May reference `{name}` and `{title}`.
    pub greeting_template: String,
}

impl Persona {
    /// Renders the greeting template.
    pub fn greeting(&self) -> String {
        self.greeting_template
            .replace("{name}", &self.name)
            .replace("{title}", &self.title)
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Kora".to_string(),
            title: "Assistant".to_string(),
            personality: "Warm, concise, helpful coordinator".to_string(),
            company_name: "BrandName".to_string(),
            greeting_template: "Hola, soy {name}, tu {title}. Te ayudo a registrar tus datos."
                .to_string(),
        }
    }
}

/// Topics that make the agent escalate straight away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationPolicy {
    pub enabled: bool,
    pub triggers: Vec<String>,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            triggers: Vec::new(),
        }
    }
}
