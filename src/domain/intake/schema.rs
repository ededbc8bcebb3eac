//! Field schema - what the agent must collect.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::ValidationError;

/// Field names are case-insensitive; this is their canonical form.
pub fn normalize_field_name(name: &str) -> String {
    name.to_lowercase()
}

fn default_required() -> bool {
    true
}

/// One field the agent should collect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Shown to the agent as a hint; never enforced when a value is recorded.
    #[serde(default)]
    pub validation_regex: Option<String>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            validation_regex: None,
        }
    }

    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, description)
        }
    }

    pub fn with_validation(mut self, pattern: impl Into<String>) -> Self {
        self.validation_regex = Some(pattern.into());
        self
    }
}

/// Ordered list of fields, as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema(Vec<FieldSpec>);

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized names of the required fields, in schema order.
    pub fn required_names(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|f| f.required)
            .map(|f| normalize_field_name(&f.name))
            .collect()
    }

    /// Looks a field up case-insensitively.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        let wanted = normalize_field_name(name);
        self.0.iter().find(|f| normalize_field_name(&f.name) == wanted)
    }

    /// Names must be non-empty and unique ignoring case.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (index, field) in self.0.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(ValidationError::empty_field(format!("fields[{}].name", index)));
            }
            if !seen.insert(normalize_field_name(&field.name)) {
                return Err(ValidationError::duplicate(field.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_schema() -> FieldSchema {
        FieldSchema::new(vec![
            FieldSpec::required("Name", "Full name"),
            FieldSpec::optional("phone", "Phone number"),
            FieldSpec::required("email", "Email address").with_validation(r"^\S+@\S+$"),
        ])
    }

    #[test]
    fn required_names_are_normalized_and_ordered() {
        assert_eq!(contact_schema().required_names(), vec!["name", "email"]);
    }

    #[test]
    fn get_ignores_case() {
        let schema = contact_schema();
        assert_eq!(schema.get("NAME").map(|f| f.description.as_str()), Some("Full name"));
        assert!(schema.get("address").is_none());
    }

    #[test]
    fn validate_accepts_unique_names() {
        assert!(contact_schema().validate().is_ok());
        assert!(FieldSchema::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_case_insensitive_duplicates() {
        let schema = FieldSchema::new(vec![
            FieldSpec::required("email", "a"),
            FieldSpec::required("EMAIL", "b"),
        ]);
        assert_eq!(schema.validate(), Err(ValidationError::duplicate("EMAIL")));
    }

    #[test]
    fn validate_rejects_blank_names() {
        let schema = FieldSchema::new(vec![FieldSpec::required(" ", "blank")]);
        assert!(matches!(
            schema.validate(),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn yaml_defaults_required_to_true() {
        let schema: FieldSchema = serde_yaml::from_str(
            "- name: name\n  description: Full name\n- name: notes\n  description: Extra\n  required: false\n",
        )
        .unwrap();
        assert!(schema.fields()[0].required);
        assert!(!schema.fields()[1].required);
        assert_eq!(schema.fields()[0].validation_regex, None);
    }
}
