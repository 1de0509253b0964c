use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::entities::ConversationTurn;
use crate::domain::ports::ConversationStore;
use crate::domain::DomainError;

/// Conversation history over the PostgREST interface of a Supabase
/// project. One row per question/answer turn.
pub struct SupabaseConversationStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    table: String,
}

#[derive(Serialize, Deserialize)]
struct TurnRow {
    conversation_id: Uuid,
    question: String,
    answer: String,
    created_at: DateTime<Utc>,
}

impl SupabaseConversationStore {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            table: "chats".to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

#[async_trait]
impl ConversationStore for SupabaseConversationStore {
    #[instrument(skip(self), fields(%conversation_id, limit))]
    async fn recent_turns(
        &self,
        conversation_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError> {
        // Newest-first with a limit, then reversed, so the window holds the
        // MOST RECENT turns in chronological order.
        let response = self
            .http
            .get(self.rest_url())
            .query(&[
                ("conversation_id", format!("eq.{conversation_id}")),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("history fetch: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::internal(format!(
                "history fetch returned {status}: {detail}"
            )));
        }

        let mut rows: Vec<TurnRow> = response
            .json()
            .await
            .map_err(|e| DomainError::internal(format!("malformed history rows: {e}")))?;
        rows.reverse();

        Ok(rows
            .into_iter()
            .map(|row| ConversationTurn {
                conversation_id: row.conversation_id,
                question: row.question,
                answer: row.answer,
                created_at: row.created_at,
            })
            .collect())
    }

    #[instrument(skip(self, turn), fields(conversation_id = %turn.conversation_id))]
    async fn save_turn(&self, turn: &ConversationTurn) -> Result<(), DomainError> {
        let row = TurnRow {
            conversation_id: turn.conversation_id,
            question: turn.question.clone(),
            answer: turn.answer.clone(),
            created_at: turn.created_at,
        };

        let response = self
            .http
            .post(self.rest_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&row)
            .send()
            .await
            .map_err(|e| DomainError::internal(format!("turn insert: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::internal(format!(
                "turn insert returned {status}: {detail}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_recent_turns_reverses_newest_first_rows() {
        let server = MockServer::start_async().await;
        let id = Uuid::new_v4();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/chats")
                    .query_param("conversation_id", format!("eq.{id}"))
                    .query_param("order", "created_at.desc")
                    .query_param("limit", "20")
                    .header("apikey", "anon");
                then.status(200).json_body(json!([
                    {
                        "conversation_id": id,
                        "question": "second q",
                        "answer": "second a",
                        "created_at": "2026-08-20T10:01:00Z"
                    },
                    {
                        "conversation_id": id,
                        "question": "first q",
                        "answer": "first a",
                        "created_at": "2026-08-20T10:00:00Z"
                    }
                ]));
            })
            .await;

        let store = SupabaseConversationStore::new(server.base_url(), "anon");
        let turns = store.recent_turns(id, 20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].question, "first q");
        assert_eq!(turns[1].question, "second q");
    }

    #[tokio::test]
    async fn test_save_turn_posts_row() {
        let server = MockServer::start_async().await;
        let id = Uuid::new_v4();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/rest/v1/chats")
                    .json_body_partial(
                        json!({"question": "q", "answer": "a"}).to_string(),
                    );
                then.status(201);
            })
            .await;

        let store = SupabaseConversationStore::new(server.base_url(), "anon");
        store
            .save_turn(&ConversationTurn::new(id, "q", "a"))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
