//! Builds the configured `LlmClient`.

use std::sync::Arc;

use super::{GeminiClient, GeminiConfig, MockLlmClient, OpenAIClient, OpenAIConfig};
use crate::config::{AiConfig, AiProvider, LlmSettings};
use crate::ports::{AIError, LlmClient};

/// Creates the client selected by `llm.provider`.
///
/// Gemini and OpenAI need an API key; a missing key is `AIError::NotConfigured`.
pub fn client_from_config(
    llm: &LlmSettings,
    ai: &AiConfig,
) -> Result<Arc<dyn LlmClient>, AIError> {
    let client: Arc<dyn LlmClient> = match llm.provider {
        AiProvider::Gemini => {
            let key = ai
                .gemini_key()
                .ok_or_else(|| AIError::NotConfigured("gemini API key missing".to_string()))?;
            let config = GeminiConfig::new(key)
                .with_model(&llm.model)
                .with_base_url(&ai.gemini_base_url)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(GeminiClient::new(config)?)
        }
        AiProvider::OpenAI => {
            let key = ai
                .openai_key()
                .ok_or_else(|| AIError::NotConfigured("openai API key missing".to_string()))?;
            let config = OpenAIConfig::new(key)
                .with_model(&llm.model)
                .with_base_url(&ai.openai_base_url)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Arc::new(OpenAIClient::new(config)?)
        }
        AiProvider::Mock => Arc::new(MockLlmClient::new()),
    };

    let info = client.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "LLM client ready");
    Ok(client)
}
