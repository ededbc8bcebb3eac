//! SendMessageHandler - Run one user turn through the agent
//!
//! The user message is stored before the agent runs, so tools see it in the
//! history. The agent's tools write to the store directly; the state is
//! reloaded afterwards so the model replies are appended on top of those
//! changes.

use std::sync::Arc;

use crate::application::TurnGate;
use crate::domain::foundation::ConversationId;
use crate::domain::intake::{ChatMessage, ChatRole, ConversationState};
use crate::ports::{AIError, ConversationAgent, ConversationStore, StoreError, ToolExecutor};

/// Command to send a message in a conversation
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub conversation_id: ConversationId,
    pub text: String,
}

/// Result of sending a message
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    /// Model messages produced during this turn, in order
    pub replies: Vec<ChatMessage>,
    /// Conversation state after the turn
    pub state: ConversationState,
}

/// Error type for sending messages
#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Agent execution failed: {0}")]
    Agent(#[from] AIError),
}

impl From<StoreError> for SendMessageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SendMessageError::NotFound(id),
            other => SendMessageError::Storage(other.to_string()),
        }
    }
}

/// Handler for sending messages in conversations
pub struct SendMessageHandler {
    store: Arc<dyn ConversationStore>,
    agent: Arc<dyn ConversationAgent>,
    tools: Arc<dyn ToolExecutor>,
    gate: TurnGate,
}

impl SendMessageHandler {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        agent: Arc<dyn ConversationAgent>,
        tools: Arc<dyn ToolExecutor>,
        gate: TurnGate,
    ) -> Self {
        Self {
            store,
            agent,
            tools,
            gate,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendMessageCommand,
    ) -> Result<SendMessageResult, SendMessageError> {
        let id = cmd.conversation_id;
        let _permit = self.gate.enter(&id).await;

        let mut state = self.store.load(&id).await?;
        state.add_message(ChatRole::User, cmd.text);
        self.store.save(&state).await?;

        let texts = match self
            .agent
            .run_turn(&id, state.messages(), self.tools.as_ref())
            .await
        {
            Ok(texts) => texts,
            Err(err) => {
                tracing::error!(conversation_id = %id, error = %err, "agent turn failed");
                return Err(err.into());
            }
        };

        let mut state = self.store.load(&id).await?;
        let replies: Vec<ChatMessage> = texts.into_iter().map(ChatMessage::model).collect();
        for reply in &replies {
            state.add_message(ChatRole::Model, reply.text.clone());
        }
        self.store.save(&state).await?;

        tracing::info!(
            conversation_id = %id,
            replies = replies.len(),
            status = %state.status(),
            collected = state.collected_fields().len(),
            "turn completed"
        );

        Ok(SendMessageResult { replies, state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockLlmClient, ModelReply};
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::adapters::tools::IntakeToolExecutor;
    use crate::domain::intake::tools::intake_tool_definitions;
    use crate::domain::intake::{ConversationStatus, FieldSchema, FieldSpec};
    use crate::ports::{AgentBlueprint, LlmClient};
    use serde_json::json;

    struct Fixture {
        store: InMemoryConversationStore,
        mock: MockLlmClient,
        handler: SendMessageHandler,
    }

    fn fixture(mock: MockLlmClient) -> Fixture {
        let store = InMemoryConversationStore::new();
        let schema = FieldSchema::new(vec![
            FieldSpec::required("name", "Full name"),
            FieldSpec::required("email", "Email"),
        ]);
        let tools = Arc::new(IntakeToolExecutor::new(Arc::new(store.clone()), schema));
        let agent = mock.create_agent(AgentBlueprint::new("agent", "collect", intake_tool_definitions()));
        let handler = SendMessageHandler::new(Arc::new(store.clone()), agent, tools, TurnGate::new());
        Fixture {
            store,
            mock,
            handler,
        }
    }

    async fn seeded(fixture: &Fixture, id: &str) -> ConversationId {
        let id = ConversationId::from_string(id);
        fixture
            .store
            .create(&ConversationState::new(id.clone()))
            .await
            .unwrap();
        id
    }

    fn cmd(id: &ConversationId, text: &str) -> SendMessageCommand {
        SendMessageCommand {
            conversation_id: id.clone(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn appends_user_and_model_messages() {
        let f = fixture(MockLlmClient::new().with_text("Hola, soy Kora."));
        let id = seeded(&f, "c1").await;

        let result = f.handler.handle(cmd(&id, "Hola")).await.unwrap();

        assert_eq!(result.replies, vec![ChatMessage::model("Hola, soy Kora.")]);
        let stored = f.store.load(&id).await.unwrap();
        assert_eq!(
            stored.messages(),
            &[ChatMessage::user("Hola"), ChatMessage::model("Hola, soy Kora.")]
        );
    }

    #[tokio::test]
    async fn tool_changes_survive_the_turn() {
        let f = fixture(
            MockLlmClient::new()
                .with_reply(ModelReply::tool_call(
                    "collect_field",
                    json!({"name": "name", "value": "Juan Perez"}),
                ))
                .with_text("Gracias Juan, ¿tu correo?"),
        );
        let id = seeded(&f, "c2").await;

        let result = f.handler.handle(cmd(&id, "Juan Perez")).await.unwrap();

        assert_eq!(result.state.field("name"), Some("Juan Perez"));
        assert_eq!(result.state.messages().len(), 2);
        assert_eq!(result.state.status(), ConversationStatus::Collecting);
    }

    #[tokio::test]
    async fn model_sees_the_new_user_message() {
        let f = fixture(MockLlmClient::new());
        let id = seeded(&f, "c3").await;

        f.handler.handle(cmd(&id, "Tengo un refund request")).await.unwrap();

        let calls = f.mock.calls();
        assert_eq!(
            calls[0].transcript.last(),
            Some(&crate::adapters::ai::TranscriptEntry::User(
                "Tengo un refund request".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let f = fixture(MockLlmClient::new());

        let result = f
            .handler
            .handle(cmd(&ConversationId::from_string("ghost"), "Hola"))
            .await;

        assert!(matches!(result, Err(SendMessageError::NotFound(_))));
        assert_eq!(f.mock.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_text_is_appended_and_the_turn_runs() {
        let f = fixture(MockLlmClient::new().with_text("¿En qué te ayudo?"));
        let id = seeded(&f, "c4").await;

        let result = f.handler.handle(cmd(&id, "")).await.unwrap();

        assert_eq!(result.replies, vec![ChatMessage::model("¿En qué te ayudo?")]);
        assert_eq!(f.mock.call_count(), 1);
        assert_eq!(
            f.store.load(&id).await.unwrap().messages(),
            &[ChatMessage::user(""), ChatMessage::model("¿En qué te ayudo?")]
        );
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_conversation_keep_order() {
        let mock = MockLlmClient::new()
            .with_delay(std::time::Duration::from_millis(20))
            .with_text("first reply")
            .with_text("second reply");
        let f = fixture(mock);
        let id = seeded(&f, "c6").await;

        let (a, b) = tokio::join!(
            f.handler.handle(cmd(&id, "first")),
            f.handler.handle(cmd(&id, "second"))
        );
        a.unwrap();
        b.unwrap();

        let texts: Vec<String> = f
            .store
            .load(&id)
            .await
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.text.clone())
            .collect();
        assert_eq!(texts, vec!["first", "first reply", "second", "second reply"]);
    }

    #[tokio::test]
    async fn agent_failure_keeps_user_message() {
        let f = fixture(MockLlmClient::new().with_error(MockError::Unavailable {
            message: "overloaded".to_string(),
        }));
        let id = seeded(&f, "c5").await;

        let result = f.handler.handle(cmd(&id, "Hola")).await;

        let err = result.unwrap_err();
        assert!(matches!(err, SendMessageError::Agent(_)));
        assert!(err.to_string().starts_with("Agent execution failed:"));
        assert_eq!(f.store.load(&id).await.unwrap().messages().len(), 1);
    }
}
