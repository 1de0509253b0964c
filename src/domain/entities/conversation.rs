use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored question/answer pair tied to a conversation identifier.
/// Owned and persisted by the external relational store; the core reads
/// turns as ordered context only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub conversation_id: Uuid,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        conversation_id: Uuid,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id,
            question: question.into(),
            answer: answer.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ephemeral output of one question-answering invocation. Persistence is a
/// caller responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResult {
    pub question: String,
    pub answer: String,
    pub candidates: Vec<crate::domain::ports::Candidate>,
}
