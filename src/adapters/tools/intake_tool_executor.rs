//! Executes intake tool calls against the conversation store.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::intake::tools::{
    intake_tool_definitions, IntakeToolCall, ToolCall, ToolCallError, ToolDefinition, ToolResponse,
};
use crate::domain::intake::FieldSchema;
use crate::ports::{ConversationStore, ToolExecutionContext, ToolExecutionError, ToolExecutor};

/// Applies the intake tools to stored conversations.
///
/// A call for an id the store has never seen registers the conversation.
/// Arguments are checked before the store is touched, so a rejected call
/// leaves no trace.
#[derive(Clone)]
pub struct IntakeToolExecutor {
    store: Arc<dyn ConversationStore>,
    schema: FieldSchema,
}

impl IntakeToolExecutor {
    pub fn new(store: Arc<dyn ConversationStore>, schema: FieldSchema) -> Self {
        Self { store, schema }
    }
}

#[async_trait]
impl ToolExecutor for IntakeToolExecutor {
    async fn execute(
        &self,
        call: ToolCall,
        context: ToolExecutionContext,
    ) -> Result<ToolResponse, ToolExecutionError> {
        let intake_call = IntakeToolCall::parse(&call)?;

        let mut state = self
            .store
            .get_or_create(&context.conversation_id)
            .await
            .map_err(|e| ToolExecutionError::system(e.to_string()))?;

        let result = intake_call.apply(&mut state, &self.schema);

        self.store
            .save(&state)
            .await
            .map_err(|e| ToolExecutionError::system(e.to_string()))?;

        tracing::info!(
            conversation_id = %context.conversation_id,
            tool = intake_call.tool_name(),
            round = context.round,
            status = %state.status(),
            "tool applied"
        );

        Ok(ToolResponse::success(result))
    }

    fn available_tools(&self) -> Vec<ToolDefinition> {
        intake_tool_definitions()
    }

    fn validate(&self, call: &ToolCall) -> Result<(), ToolCallError> {
        IntakeToolCall::parse(call).map(|_| ())
    }
}
