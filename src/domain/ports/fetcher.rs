use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// Retrieves remote PDF bytes. A fetch failure is fatal for the calling
/// operation and happens before any model call.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}
