//! ConversationStatus enum for tracking the intake lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an intake conversation.
///
/// `Completed` is part of the wire vocabulary but no operation currently
/// moves a conversation into it; escalation is the only hand-off path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationStatus {
    #[default]
    Collecting,
    Escalated,
    Completed,
}

impl ConversationStatus {
    /// Returns true while the agent is still gathering fields.
    pub fn is_collecting(&self) -> bool {
        matches!(self, ConversationStatus::Collecting)
    }
}

impl StateMachine for ConversationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationStatus::*;
        matches!((self, target), (Collecting, Escalated) | (Collecting, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationStatus::*;
        match self {
            Collecting => vec![Escalated, Completed],
            Escalated | Completed => vec![],
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationStatus::Collecting => "COLLECTING",
            ConversationStatus::Escalated => "ESCALATED",
            ConversationStatus::Completed => "COMPLETED",
        };
        write!(f, "{}", s)
    }
}
