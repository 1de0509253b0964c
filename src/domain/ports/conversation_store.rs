use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ConversationTurn;
use crate::domain::errors::DomainError;

/// Read/write access to the external relational store holding conversation
/// history. The core only reads ordered turn history and writes completed
/// answers back.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The most recent `limit` turns for a conversation, ordered ascending
    /// by creation time.
    async fn recent_turns(
        &self,
        conversation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError>;

    async fn save_turn(&self, turn: &ConversationTurn) -> Result<(), DomainError>;
}
