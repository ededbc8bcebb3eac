//! Error types for the domain layer.

use thiserror::Error;

/// Errors raised when a value object or configuration fragment is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' is duplicated")]
    Duplicate { field: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate entry validation error.
    pub fn duplicate(field: impl Into<String>) -> Self {
        ValidationError::Duplicate { field: field.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_correctly() {
        let err = ValidationError::empty_field("fields[0].name");
        assert_eq!(err.to_string(), "Field 'fields[0].name' cannot be empty");
    }

    #[test]
    fn invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("state_transition", "already escalated");
        assert_eq!(
            err.to_string(),
            "Field 'state_transition' has invalid format: already escalated"
        );
    }

    #[test]
    fn duplicate_displays_correctly() {
        let err = ValidationError::duplicate("email");
        assert_eq!(err.to_string(), "Field 'email' is duplicated");
    }
}
