use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::entities::{Chunk, CollectionSchema, Embedding, SearchResult};
use crate::domain::ports::VectorStore;
use crate::domain::DomainError;

struct CollectionData {
    schema: Option<CollectionSchema>,
    records: Vec<(Chunk, Embedding)>,
}

/// In-process store for tests and local development. Mirrors the write
/// semantics of the real store: bulk writes are all-or-nothing and a write
/// does not require the collection to have been provisioned first.
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, CollectionData>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection_count(&self) -> usize {
        self.collections.read().unwrap().len()
    }

    pub fn record_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(|data| data.records.len())
            .unwrap_or(0)
    }

    pub fn chunks(&self, collection: &str) -> Vec<Chunk> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(|data| data.records.iter().map(|(chunk, _)| chunk.clone()).collect())
            .unwrap_or_default()
    }

    pub fn schema(&self, collection: &str) -> Option<CollectionSchema> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .and_then(|data| data.schema.clone())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn exists(&self, collection: &str) -> Result<bool, DomainError> {
        Ok(self.collections.read().unwrap().contains_key(collection))
    }

    async fn create_collection(
        &self,
        collection: &str,
        schema: &CollectionSchema,
    ) -> Result<(), DomainError> {
        let mut collections = self.collections.write().unwrap();
        if collections.contains_key(collection) {
            return Err(DomainError::schema_provision(
                collection,
                "collection already exists",
            ));
        }
        collections.insert(
            collection.to_string(),
            CollectionData {
                schema: Some(schema.clone()),
                records: Vec::new(),
            },
        );
        Ok(())
    }

    async fn write_batch(
        &self,
        collection: &str,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<usize, DomainError> {
        if chunks.len() != embeddings.len() {
            return Err(DomainError::validation(format!(
                "chunk/embedding count mismatch: {} vs {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let mut collections = self.collections.write().unwrap();
        let data = collections
            .entry(collection.to_string())
            .or_insert_with(|| CollectionData {
                schema: None,
                records: Vec::new(),
            });
        data.records
            .extend(chunks.iter().cloned().zip(embeddings.iter().cloned()));
        Ok(chunks.len())
    }

    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let collections = self.collections.read().unwrap();
        let Some(data) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<SearchResult> = data
            .records
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }
}
