//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Environment variable the Google SDKs read; honoured when no key is configured.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key (falls back to `GOOGLE_API_KEY`)
    pub gemini_api_key: Option<String>,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Gemini REST base URL
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// OpenAI-compatible REST base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Model/tool round trips allowed per user turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    OpenAI,
    /// Scripted replies; for local runs and tests
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Longest a single model call can take: every attempt hits the timeout,
    /// with the 1s, 2s, 4s... backoff between retries.
    pub fn model_call_budget(&self) -> Duration {
        let attempts = u64::from(self.max_retries) + 1;
        let backoff: u64 = (0..self.max_retries).map(|n| 1u64 << n.min(6)).sum();
        Duration::from_secs(self.timeout_secs * attempts + backoff)
    }

    /// Gemini key from config, else from `GOOGLE_API_KEY`
    pub fn gemini_key(&self) -> Option<String> {
        resolve_key(
            self.gemini_api_key.as_deref(),
            std::env::var(GOOGLE_API_KEY_ENV).ok().as_deref(),
        )
    }

    /// OpenAI key, if configured
    pub fn openai_key(&self) -> Option<String> {
        resolve_key(self.openai_api_key.as_deref(), None)
    }

    /// Validate limits
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_tool_rounds == 0 {
            return Err(ValidationError::InvalidToolRounds);
        }
        Ok(())
    }

    /// Validate that the selected provider can be reached
    pub fn validate_for(&self, provider: AiProvider) -> Result<(), ValidationError> {
        self.validate()?;
        match provider {
            AiProvider::Gemini if self.gemini_key().is_none() => Err(
                ValidationError::MissingRequired("INTAKE_AGENT__AI__GEMINI_API_KEY or GOOGLE_API_KEY"),
            ),
            AiProvider::OpenAI if self.openai_key().is_none() => Err(
                ValidationError::MissingRequired("INTAKE_AGENT__AI__OPENAI_API_KEY"),
            ),
            _ => Ok(()),
        }
    }
}

fn resolve_key(configured: Option<&str>, fallback: Option<&str>) -> Option<String> {
    configured
        .filter(|k| !k.trim().is_empty())
        .or(fallback.filter(|k| !k.trim().is_empty()))
        .map(str::to_string)
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            openai_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            openai_base_url: default_openai_base_url(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_max_tool_rounds() -> u32 {
    crate::ports::DEFAULT_MAX_TOOL_ROUNDS
}
