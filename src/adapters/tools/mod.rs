//! Tool Executor Adapters
//!
//! - **IntakeToolExecutor** - applies `collect_field` and
//!   `escalate_conversation` to conversations held in a `ConversationStore`

mod intake_tool_executor;

pub use intake_tool_executor::IntakeToolExecutor;
