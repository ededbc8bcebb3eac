//! Per-conversation turn serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::ConversationId;

/// Serializes turns on the same conversation.
///
/// Each conversation gets its own async lane; turns on different
/// conversations never wait on each other. Lanes live as long as the gate,
/// like the conversations themselves.
#[derive(Debug, Clone, Default)]
pub struct TurnGate {
    lanes: Arc<Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>>,
}

/// Held for the duration of one turn.
pub type TurnPermit = OwnedMutexGuard<()>;

impl TurnGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn is running on `id`.
    pub async fn enter(&self, id: &ConversationId) -> TurnPermit {
        let lane = {
            let mut lanes = self.lanes.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(lanes.entry(id.clone()).or_default())
        };
        lane.lock_owned().await
    }

    /// Number of conversations that have had a turn.
    pub fn lane_count(&self) -> usize {
        self.lanes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_conversation_waits() {
        let gate = TurnGate::new();
        let id = ConversationId::from_string("a");

        let permit = gate.enter(&id).await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.enter(&id)).await;
        assert!(blocked.is_err());

        drop(permit);
        let reentered = tokio::time::timeout(Duration::from_millis(50), gate.enter(&id)).await;
        assert!(reentered.is_ok());
    }

    #[tokio::test]
    async fn different_conversations_do_not_block() {
        let gate = TurnGate::new();
        let _a = gate.enter(&ConversationId::from_string("a")).await;

        let other = tokio::time::timeout(
            Duration::from_millis(50),
            gate.enter(&ConversationId::from_string("b")),
        )
        .await;
        assert!(other.is_ok());
        assert_eq!(gate.lane_count(), 2);
    }
}
