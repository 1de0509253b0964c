use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use crate::domain::ports::{AuthService, UserIdentity};
use crate::domain::DomainError;

/// Bearer-token validation against the Supabase auth endpoint. The user's
/// own token goes in the Authorization header; the project anon key rides
/// along as apikey.
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Deserialize)]
struct UserRow {
    id: String,
    email: Option<String>,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl AuthService for SupabaseAuth {
    #[instrument(skip(self, bearer_token))]
    async fn authenticate(&self, bearer_token: &str) -> Result<UserIdentity, DomainError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| DomainError::unauthorized(format!("auth request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DomainError::unauthorized("invalid or expired token"));
        }

        let user: UserRow = response
            .json()
            .await
            .map_err(|e| DomainError::unauthorized(format!("malformed user payload: {e}")))?;
        Ok(UserIdentity {
            id: user.id,
            email: user.email,
        })
    }
}
