//! Application configuration module
//!
//! Service settings come from environment variables via the `config` and
//! `dotenvy` crates, with the `INTAKE_AGENT` prefix and `__` separating
//! nested values. The agent itself (persona, fields, escalation, model) is
//! described by a YAML file whose path is part of that configuration.
//!
//! # Example
//!
//! ```no_run
//! use intake_agent::config::{AppConfig, IntakeConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! let intake = IntakeConfig::load(&config.intake.config_path).expect("Invalid intake config");
//! ```

mod ai;
mod error;
mod intake;
mod server;

pub use ai::{AiConfig, AiProvider, GOOGLE_API_KEY_ENV};
pub use error::{ConfigError, ValidationError};
pub use intake::{IntakeConfig, IntakeSourceConfig, LlmSettings, DEFAULT_INTAKE_CONFIG_PATH};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (keys, timeouts, retries)
    #[serde(default)]
    pub ai: AiConfig,

    /// Location of the intake YAML
    #[serde(default)]
    pub intake: IntakeSourceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INTAKE_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `INTAKE_AGENT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `INTAKE_AGENT__INTAKE__CONFIG_PATH=conf/clinic.yaml` -> `intake.config_path`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTAKE_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate service settings.
    ///
    /// Provider keys are checked separately against the provider the intake
    /// YAML selects (see [`AiConfig::validate_for`]).
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;

        // A request cut off mid-call loses the model replies of its turn.
        let request = self.server.request_timeout();
        let model = self.ai.model_call_budget();
        if request <= model {
            return Err(ValidationError::TimeoutBudget {
                request_secs: request.as_secs(),
                model_secs: model.as_secs(),
            });
        }
        Ok(())
    }

    /// Loads the intake YAML this configuration points at.
    pub fn load_intake(&self) -> Result<IntakeConfig, ConfigError> {
        let intake = IntakeConfig::load(&self.intake.config_path)?;
        intake.validate()?;
        Ok(intake)
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
