//! IntakeService - the wired-up application.
//!
//! Holds the ports every handler needs and hands out handlers on demand.
//! Cloning is cheap; all clones share the same store and turn gate.

use std::sync::Arc;

use super::handlers::conversation::{
    CreateConversationCommand, CreateConversationError, CreateConversationHandler,
    CreateConversationResult, GetConversationError, GetConversationHandler, GetConversationQuery,
    SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult,
};
use super::TurnGate;
use crate::domain::foundation::ConversationId;
use crate::domain::intake::ConversationState;
use crate::ports::{ConversationAgent, ConversationStore, ToolExecutor};

#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn ConversationStore>,
    agent: Arc<dyn ConversationAgent>,
    tools: Arc<dyn ToolExecutor>,
    gate: TurnGate,
}

impl IntakeService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        agent: Arc<dyn ConversationAgent>,
        tools: Arc<dyn ToolExecutor>,
    ) -> Self {
        Self {
            store,
            agent,
            tools,
            gate: TurnGate::new(),
        }
    }

    pub fn create_conversation_handler(&self) -> CreateConversationHandler {
        CreateConversationHandler::new(Arc::clone(&self.store))
    }

    pub fn send_message_handler(&self) -> SendMessageHandler {
        SendMessageHandler::new(
            Arc::clone(&self.store),
            Arc::clone(&self.agent),
            Arc::clone(&self.tools),
            self.gate.clone(),
        )
    }

    pub fn get_conversation_handler(&self) -> GetConversationHandler {
        GetConversationHandler::new(Arc::clone(&self.store))
    }

    pub async fn create_conversation(
        &self,
        conversation_id: Option<ConversationId>,
    ) -> Result<CreateConversationResult, CreateConversationError> {
        self.create_conversation_handler()
            .handle(CreateConversationCommand { conversation_id })
            .await
    }

    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: impl Into<String>,
    ) -> Result<SendMessageResult, SendMessageError> {
        self.send_message_handler()
            .handle(SendMessageCommand {
                conversation_id,
                text: text.into(),
            })
            .await
    }

    pub async fn get_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> Result<ConversationState, GetConversationError> {
        self.get_conversation_handler()
            .handle(GetConversationQuery { conversation_id })
            .await
    }
}
