//! Intake agent configuration (persona, fields, escalation, model)
//!
//! Loaded once at startup from YAML and read-only afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::ai::AiProvider;
use super::error::{ConfigError, ValidationError};
use crate::domain::intake::{EscalationPolicy, FieldSchema, Persona};

/// Used when `intake.config_path` is not set.
pub const DEFAULT_INTAKE_CONFIG_PATH: &str = "config/base_config.yaml";

/// Where to find the intake YAML
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeSourceConfig {
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
}

impl Default for IntakeSourceConfig {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
        }
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_INTAKE_CONFIG_PATH)
}

/// Model selection for the agent
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: AiProvider,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: AiProvider::Gemini,
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.1,
        }
    }
}

/// Full intake configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub persona: Persona,

    #[serde(default)]
    pub fields: FieldSchema,

    #[serde(default)]
    pub escalation: EscalationPolicy,

    #[serde(default)]
    pub llm: LlmSettings,
}

impl IntakeConfig {
    /// Loads the intake YAML.
    ///
    /// A missing file at [`DEFAULT_INTAKE_CONFIG_PATH`] yields the built-in
    /// defaults; any other missing path is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            if path == Path::new(DEFAULT_INTAKE_CONFIG_PATH) {
                tracing::warn!(
                    path = %path.display(),
                    "intake config not found, using built-in defaults"
                );
                return Ok(Self::default());
            }
            return Err(ConfigError::ConfigMissing(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        tracing::info!(
            path = %path.display(),
            fields = config.fields.fields().len(),
            provider = ?config.llm.provider,
            model = %config.llm.model,
            "loaded intake config"
        );
        Ok(config)
    }

    /// Parses YAML; an empty document means all defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Validate intake configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.fields.validate()?;
        if self.llm.model.trim().is_empty() {
            return Err(ValidationError::EmptyModel);
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ValidationError::InvalidTemperature(self.llm.temperature));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
persona:
  name: Kora
  title: Asistente
  company_name: Acme
fields:
  - name: name
    description: Full name
  - name: phone
    description: Phone number
    required: false
  - name: email
    description: Email address
    validation_regex: '^\S+@\S+$'
escalation:
  triggers: ["refund request", "urgente"]
llm:
  provider: mock
  model: scripted
  temperature: 0.3
"#;

    #[test]
    fn defaults_match_builtin_persona_and_model() {
        let config = IntakeConfig::default();
        assert_eq!(config.persona.name, "Kora");
        assert!(config.fields.is_empty());
        assert!(config.escalation.enabled);
        assert_eq!(config.llm.provider, AiProvider::Gemini);
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!((config.llm.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_full_yaml() {
        let config = IntakeConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.persona.title, "Asistente");
        assert_eq!(config.persona.personality, "Warm, concise, helpful coordinator");
        assert_eq!(config.fields.required_names(), vec!["name", "email"]);
        assert_eq!(config.escalation.triggers.len(), 2);
        assert_eq!(config.llm.provider, AiProvider::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(IntakeConfig::from_yaml("  \n").unwrap(), IntakeConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = IntakeConfig::from_yaml("fields: [oops");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = IntakeConfig::load(file.path()).unwrap();
        assert_eq!(config.persona.company_name, "Acme");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        assert!(matches!(
            IntakeConfig::load(&path),
            Err(ConfigError::ConfigMissing(p)) if p == path
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let config = IntakeConfig {
            llm: LlmSettings {
                temperature: 2.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicate_fields() {
        let config = IntakeConfig::from_yaml(
            "fields:\n  - {name: email, description: a}\n  - {name: Email, description: b}\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFields(_))
        ));
    }
}
