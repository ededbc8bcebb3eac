//! Provider-agnostic tool-calling loop.
//!
//! A [`ChatBackend`] performs a single model round trip. [`ToolLoopAgent`]
//! drives it: every tool call the model returns is executed and its result
//! appended to the transcript, and the model is asked again until it answers
//! with text only.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::intake::tools::{ToolCall, ToolResponse};
use crate::domain::intake::{ChatMessage, ChatRole};
use crate::ports::{
    AIError, AgentBlueprint, ConversationAgent, ProviderInfo, ToolExecutionContext,
    ToolExecutionError, ToolExecutor,
};

/// One entry of the transcript sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEntry {
    User(String),
    Model(String),
    ToolCall(ToolCall),
    ToolResult {
        call_id: Option<String>,
        name: String,
        response: serde_json::Value,
    },
}

impl From<&ChatMessage> for TranscriptEntry {
    fn from(message: &ChatMessage) -> Self {
        match message.role {
            ChatRole::User => TranscriptEntry::User(message.text.clone()),
            ChatRole::Model => TranscriptEntry::Model(message.text.clone()),
        }
    }
}

/// What the model returned for one round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    pub texts: Vec<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    /// A reply consisting of a single text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::default().with_text(text)
    }

    /// A reply consisting of a single tool call.
    pub fn tool_call(name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self::default().with_tool_call(ToolCall::new(name, parameters))
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }
}

/// A single model round trip for a particular provider.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(
        &self,
        blueprint: &AgentBlueprint,
        transcript: &[TranscriptEntry],
    ) -> Result<ModelReply, AIError>;

    fn provider_info(&self) -> ProviderInfo;
}

/// Agent that alternates model round trips and tool execution.
///
/// A turn that exhausts `max_tool_rounds` fails with `ToolLoopExceeded`;
/// text the model produced earlier in that turn is logged and not returned.
pub struct ToolLoopAgent<B: ?Sized> {
    backend: Arc<B>,
    blueprint: AgentBlueprint,
}

impl<B: ChatBackend + ?Sized> ToolLoopAgent<B> {
    pub fn new(backend: Arc<B>, blueprint: AgentBlueprint) -> Self {
        Self { backend, blueprint }
    }
}

#[async_trait]
impl<B: ChatBackend + ?Sized + 'static> ConversationAgent for ToolLoopAgent<B> {
    async fn run_turn(
        &self,
        conversation_id: &ConversationId,
        history: &[ChatMessage],
        tools: &dyn ToolExecutor,
    ) -> Result<Vec<String>, AIError> {
        let mut transcript: Vec<TranscriptEntry> = history.iter().map(Into::into).collect();
        let mut replies = Vec::new();
        let max_rounds = self.blueprint.max_tool_rounds;

        for round in 0..=max_rounds {
            let reply = self.backend.generate(&self.blueprint, &transcript).await?;

            for text in reply.texts {
                let text = text.trim();
                if !text.is_empty() {
                    replies.push(text.to_string());
                    transcript.push(TranscriptEntry::Model(text.to_string()));
                }
            }

            if reply.tool_calls.is_empty() {
                return Ok(replies);
            }
            if round == max_rounds {
                break;
            }

            transcript.extend(reply.tool_calls.iter().cloned().map(TranscriptEntry::ToolCall));
            for call in reply.tool_calls {
                let call_id = call.id().map(str::to_string);
                let name = call.name().to_string();
                let context = ToolExecutionContext::new(conversation_id.clone(), round + 1);

                let response = match tools.execute(call, context).await {
                    Ok(response) => response,
                    Err(ToolExecutionError::InvalidCall(err)) => {
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            tool = %name,
                            error = %err,
                            "rejected tool call"
                        );
                        ToolResponse::error(err.to_string())
                    }
                    Err(ToolExecutionError::SystemError(message)) => {
                        return Err(AIError::ToolFailed(message));
                    }
                };

                transcript.push(TranscriptEntry::ToolResult {
                    call_id,
                    name,
                    response: response.to_model_payload(),
                });
            }
        }

        tracing::warn!(
            conversation_id = %conversation_id,
            rounds = max_rounds,
            dropped_replies = ?replies,
            "model kept calling tools"
        );
        Err(AIError::ToolLoopExceeded { rounds: max_rounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockLlmClient};
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::adapters::tools::IntakeToolExecutor;
    use crate::domain::intake::tools::intake_tool_definitions;
    use crate::domain::intake::{ConversationStatus, FieldSchema, FieldSpec};
    use crate::ports::{ConversationStore, LlmClient};
    use serde_json::json;

    fn blueprint(rounds: u32) -> AgentBlueprint {
        AgentBlueprint::new("agent", "collect things", intake_tool_definitions())
            .with_max_tool_rounds(rounds)
    }

    fn executor(store: &InMemoryConversationStore) -> IntakeToolExecutor {
        IntakeToolExecutor::new(
            Arc::new(store.clone()),
            FieldSchema::new(vec![FieldSpec::required("name", "Full name")]),
        )
    }

    fn id() -> ConversationId {
        ConversationId::from_string("loop-test")
    }

    #[tokio::test]
    async fn text_only_reply_ends_turn() {
        let mock = MockLlmClient::new().with_reply(ModelReply::text("  Hola!  ").with_text("   "));
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(4));

        let replies = agent
            .run_turn(&id(), &[ChatMessage::user("Hola")], &executor(&store))
            .await
            .unwrap();

        assert_eq!(replies, vec!["Hola!"]);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn tool_results_are_fed_back_to_model() {
        let mock = MockLlmClient::new()
            .with_reply(ModelReply::tool_call("collect_field", json!({"name": "Name", "value": "Juan"})))
            .with_reply(ModelReply::text("Gracias, Juan"));
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(4));

        let replies = agent
            .run_turn(&id(), &[ChatMessage::user("Juan")], &executor(&store))
            .await
            .unwrap();

        assert_eq!(replies, vec!["Gracias, Juan"]);
        let state = store.load(&id()).await.unwrap();
        assert_eq!(state.field("name"), Some("Juan"));

        let second = &mock.calls()[1].transcript;
        assert!(matches!(
            second.last(),
            Some(TranscriptEntry::ToolResult { name, response, .. })
                if name == "collect_field" && response["isComplete"] == json!(true)
        ));
    }

    #[tokio::test]
    async fn rejected_call_is_reported_to_model_without_mutation() {
        let mock = MockLlmClient::new()
            .with_reply(ModelReply::tool_call("collect_field", json!({"name": "email"})))
            .with_reply(ModelReply::text("Perdón, ¿tu correo?"));
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(4));

        agent
            .run_turn(&id(), &[ChatMessage::user("x")], &executor(&store))
            .await
            .unwrap();

        assert!(!store.exists(&id()).await.unwrap());
        let second = &mock.calls()[1].transcript;
        assert!(matches!(
            second.last(),
            Some(TranscriptEntry::ToolResult { response, .. }) if response.get("error").is_some()
        ));
    }

    #[tokio::test]
    async fn escalation_tool_updates_state() {
        let mock = MockLlmClient::new()
            .with_reply(
                ModelReply::text("Te paso con un humano.").with_tool_call(ToolCall::new(
                    "escalate_conversation",
                    json!({"reason": "refund", "summary": "urgent refund"}),
                )),
            )
            .with_reply(ModelReply::default());
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(4));

        let replies = agent
            .run_turn(&id(), &[ChatMessage::user("refund!")], &executor(&store))
            .await
            .unwrap();

        assert_eq!(replies, vec!["Te paso con un humano."]);
        let state = store.load(&id()).await.unwrap();
        assert_eq!(state.status(), ConversationStatus::Escalated);
    }

    #[tokio::test]
    async fn endless_tool_calls_fail_the_turn() {
        let call = ModelReply::tool_call("collect_field", json!({"name": "name", "value": "x"}));
        let mock = MockLlmClient::new()
            .with_reply(call.clone())
            .with_reply(call.clone())
            .with_reply(call);
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(2));

        let result = agent
            .run_turn(&id(), &[ChatMessage::user("x")], &executor(&store))
            .await;

        assert!(matches!(result, Err(AIError::ToolLoopExceeded { rounds: 2 })));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn text_from_an_exhausted_turn_is_not_returned() {
        let call = ModelReply::text("Un momento...")
            .with_tool_call(ToolCall::new("collect_field", json!({"name": "name", "value": "x"})));
        let mock = MockLlmClient::new()
            .with_reply(call.clone())
            .with_reply(call);
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(1));

        let result = agent
            .run_turn(&id(), &[ChatMessage::user("x")], &executor(&store))
            .await;

        assert!(matches!(result, Err(AIError::ToolLoopExceeded { rounds: 1 })));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(store.load(&id()).await.unwrap().field("name"), Some("x"));
    }

    #[tokio::test]
    async fn backend_error_propagates() {
        let mock = MockLlmClient::new().with_error(MockError::AuthenticationFailed);
        let store = InMemoryConversationStore::new();
        let agent = mock.create_agent(blueprint(2));

        let result = agent
            .run_turn(&id(), &[ChatMessage::user("x")], &executor(&store))
            .await;

        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
    }

    #[test]
    fn history_maps_to_transcript() {
        let entry: TranscriptEntry = (&ChatMessage::model("hi")).into();
        assert_eq!(entry, TranscriptEntry::Model("hi".to_string()));
    }
}
