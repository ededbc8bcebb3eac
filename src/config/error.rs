//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::foundation::ValidationError as DomainValidationError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Intake config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Failed to read intake config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid intake config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error(
        "Request timeout ({request_secs}s) must exceed the model call budget ({model_secs}s)"
    )]
    TimeoutBudget { request_secs: u64, model_secs: u64 },

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("LLM temperature must be between 0 and 2, got {0}")]
    InvalidTemperature(f32),

    #[error("LLM model name cannot be empty")]
    EmptyModel,

    #[error("max_tool_rounds must be at least 1")]
    InvalidToolRounds,

    #[error("Invalid field schema: {0}")]
    InvalidFields(#[from] DomainValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigError::ConfigMissing(PathBuf::from("conf/custom.yaml"));
        assert_eq!(err.to_string(), "Intake config file not found: conf/custom.yaml");
    }

    #[test]
    fn field_schema_errors_are_wrapped() {
        let err: ValidationError = DomainValidationError::duplicate("email").into();
        assert_eq!(
            err.to_string(),
            "Invalid field schema: Field 'email' is duplicated"
        );
    }
}
