use async_trait::async_trait;

use crate::domain::entities::{Chunk, CollectionSchema, Embedding, SearchResult};
use crate::domain::errors::DomainError;

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn exists(&self, collection: &str) -> Result<bool, DomainError>;

    /// Creates the collection with the given property schema. Vectors are
    /// supplied externally per record; the store never computes embeddings.
    async fn create_collection(
        &self,
        collection: &str,
        schema: &CollectionSchema,
    ) -> Result<(), DomainError>;

    /// Bulk-persists chunks with their embeddings in one operation.
    /// Fails fast on a length mismatch; never truncates. Returns the number
    /// of records written.
    async fn write_batch(
        &self,
        collection: &str,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<usize, DomainError>;

    /// Similarity search over stored chunk embeddings. Optional path: the
    /// active QA loop favors direct page-window context instead.
    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;
}
