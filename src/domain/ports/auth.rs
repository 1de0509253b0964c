use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
}

/// Token validation delegated to the external auth provider.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<UserIdentity, DomainError>;
}
