use std::sync::Arc;
use tracing::instrument;

use crate::domain::ports::{EmbeddingService, VectorStore};
use crate::domain::{DomainError, SearchResult};

/// Similarity retrieval over stored chunk embeddings. Pluggable alternative
/// to the QA loop's page-window context; not on the active answer path.
pub struct SearchService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl SearchService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    #[instrument(skip(self), fields(collection))]
    pub async fn retrieve(
        &self,
        query: &str,
        collection: &str,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(query, collection, self.default_top_k).await
    }

    #[instrument(skip(self), fields(collection, top_k))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(collection, &embedding, top_k).await
    }

    pub async fn collection_ready(&self, collection: &str) -> Result<bool, DomainError> {
        self.vector_store.exists(collection).await
    }
}
