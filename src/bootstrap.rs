//! Process startup shared by the server and the evaluation binary.

use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::adapters::ai::client_from_config;
use crate::adapters::storage::InMemoryConversationStore;
use crate::adapters::tools::IntakeToolExecutor;
use crate::application::IntakeService;
use crate::config::{AiConfig, IntakeConfig, ServerConfig, ValidationError};
use crate::domain::intake::tools::intake_tool_definitions;
use crate::domain::intake::{AgentInstructions, AGENT_NAME};
use crate::ports::{AIError, AgentBlueprint, LlmClient};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("could not create LLM client: {0}")]
    Client(#[from] AIError),
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `server.log_level`. Production logs are JSON.
pub fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// The agent definition derived from the intake config.
pub fn agent_blueprint(intake: &IntakeConfig, max_tool_rounds: u32) -> AgentBlueprint {
    let instruction =
        AgentInstructions::new(&intake.persona, &intake.fields, &intake.escalation).render();

    AgentBlueprint::new(AGENT_NAME, instruction, intake_tool_definitions())
        .with_temperature(intake.llm.temperature)
        .with_max_tool_rounds(max_tool_rounds)
}

/// Wires a fresh in-memory service around `client`.
pub fn service_with_client(
    intake: &IntakeConfig,
    max_tool_rounds: u32,
    client: &dyn LlmClient,
) -> IntakeService {
    let store = Arc::new(InMemoryConversationStore::new());
    let tools = Arc::new(IntakeToolExecutor::new(store.clone(), intake.fields.clone()));
    let agent = client.create_agent(agent_blueprint(intake, max_tool_rounds));

    IntakeService::new(store, agent, tools)
}

/// Builds the service for the provider selected in `intake.llm`.
pub fn build_intake_service(
    intake: &IntakeConfig,
    ai: &AiConfig,
) -> Result<IntakeService, BootstrapError> {
    ai.validate_for(intake.llm.provider)?;
    let client = client_from_config(&intake.llm, ai)?;
    Ok(service_with_client(intake, ai.max_tool_rounds, client.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockLlmClient;
    use crate::config::AiProvider;
    use crate::domain::intake::{FieldSchema, FieldSpec};

    fn intake(provider: AiProvider) -> IntakeConfig {
        let mut config = IntakeConfig {
            fields: FieldSchema::new(vec![FieldSpec::required("name", "Full name")]),
            ..IntakeConfig::default()
        };
        config.llm.provider = provider;
        config
    }

    #[test]
    fn blueprint_carries_instructions_and_settings() {
        let bp = agent_blueprint(&intake(AiProvider::Mock), 5);

        assert_eq!(bp.name, AGENT_NAME);
        assert!(bp.instruction.contains("- name (required): Full name"));
        assert_eq!(bp.temperature, Some(0.1));
        assert_eq!(bp.max_tool_rounds, 5);
        assert_eq!(bp.tools.len(), 2);
    }

    #[tokio::test]
    async fn mock_service_runs_a_turn() {
        let mock = MockLlmClient::new().with_text("Hola, soy Kora");
        let service = service_with_client(&intake(AiProvider::Mock), 4, &mock);

        let created = service.create_conversation(None).await.unwrap();
        let result = service
            .send_message(created.state.id().clone(), "Hola")
            .await
            .unwrap();

        assert_eq!(result.replies[0].text, "Hola, soy Kora");
        assert_eq!(mock.calls()[0].agent_name, AGENT_NAME);
    }

    #[test]
    fn openai_without_key_is_rejected() {
        let result = build_intake_service(&intake(AiProvider::OpenAI), &AiConfig::default());
        assert!(matches!(
            result,
            Err(BootstrapError::Config(ValidationError::MissingRequired(_)))
        ));
    }

    #[test]
    fn mock_provider_needs_no_key() {
        assert!(build_intake_service(&intake(AiProvider::Mock), &AiConfig::default()).is_ok());
    }
}
