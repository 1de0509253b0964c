use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::entities::{
    Chunk, ChunkMetadata, CollectionSchema, Embedding, ExtractionMethod, PropertyType,
    SearchResult,
};
use crate::domain::ports::VectorStore;
use crate::domain::DomainError;

/// Inverse of `ExtractionMethod::as_str`; unknown values fall back to
/// direct, matching the metadata default.
fn method_from_str(s: &str) -> ExtractionMethod {
    match s {
        "vision" => ExtractionMethod::Vision,
        _ => ExtractionMethod::Direct,
    }
}

/// Qdrant-backed chunk store. Collections are cosine-distance with
/// externally supplied vectors; chunk metadata lives in the point payload
/// with a payload index per schema property.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    pub fn new(url: &str) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::internal(format!("qdrant client: {e}")))?;
        Ok(Self { client })
    }

    fn payload_for(chunk: &Chunk) -> Result<Payload, DomainError> {
        let m = &chunk.metadata;
        serde_json::json!({
            "content": chunk.content,
            "book_title": m.book_title,
            "source_path": m.source_path,
            "page_number": m.page_number,
            "chunk_index": m.chunk_index,
            "extraction_method": m.extraction_method.as_str(),
            "has_images": m.has_images,
            "has_tables": m.has_tables,
            "has_formulas": m.has_formulas,
        })
        .try_into()
        .map_err(|_| DomainError::internal("failed to build point payload"))
    }

    fn field_type(data_type: PropertyType) -> FieldType {
        match data_type {
            PropertyType::Text => FieldType::Keyword,
            PropertyType::Int => FieldType::Integer,
            PropertyType::Bool => FieldType::Bool,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn exists(&self, collection: &str) -> Result<bool, DomainError> {
        self.client
            .collection_exists(collection)
            .await
            .map_err(|e| DomainError::schema_provision(collection, e.to_string()))
    }

    #[instrument(skip(self, schema), fields(collection, dimension = schema.dimension))]
    async fn create_collection(
        &self,
        collection: &str,
        schema: &CollectionSchema,
    ) -> Result<(), DomainError> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection).vectors_config(VectorParamsBuilder::new(
                    schema.dimension as u64,
                    Distance::Cosine,
                )),
            )
            .await
            .map_err(|e| DomainError::schema_provision(collection, e.to_string()))?;

        for property in &schema.properties {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    collection,
                    property.name,
                    Self::field_type(property.data_type),
                ))
                .await
                .map_err(|e| {
                    DomainError::schema_provision(
                        collection,
                        format!("index for '{}': {e}", property.name),
                    )
                })?;
        }

        debug!(collection, "collection provisioned");
        Ok(())
    }

    #[instrument(skip(self, chunks, embeddings), fields(collection, count = chunks.len()))]
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
        if chunks.is_empty() {
            return Ok(0);
        }

        let mut points = Vec::with_capacity(chunks.len());
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            points.push(PointStruct::new(
                Uuid::new_v4().to_string(),
                embedding.as_slice().to_vec(),
                Self::payload_for(chunk)?,
            ));
        }

        // Single bulk request: either the whole batch lands or the error
        // propagates with nothing reported as written.
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points))
            .await
            .map_err(|e| DomainError::store_write(collection, e.to_string()))?;

        Ok(chunks.len())
    }

    async fn search(
        &self,
        collection: &str,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::store_write(collection, e.to_string()))?;

        let hits = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;
                let content = payload.get("content")?.as_str()?.to_string();
                let extraction_method =
                    method_from_str(payload.get("extraction_method")?.as_str()?);
                let metadata = ChunkMetadata {
                    book_title: payload.get("book_title")?.as_str()?.to_string(),
                    source_path: payload.get("source_path")?.as_str()?.to_string(),
                    page_number: payload.get("page_number")?.as_integer()? as u32,
                    chunk_index: payload.get("chunk_index")?.as_integer()? as u32,
                    extraction_method,
                    has_images: payload.get("has_images")?.as_bool()?,
                    has_tables: payload.get("has_tables")?.as_bool()?,
                    has_formulas: payload.get("has_formulas")?.as_bool()?,
                };
                Some(SearchResult {
                    chunk: Chunk::new(content, metadata),
                    score: point.score,
                })
            })
            .collect();

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trips_through_payload_string() {
        for method in [ExtractionMethod::Direct, ExtractionMethod::Vision] {
            let stored = method.as_str().to_string();
            assert_eq!(method_from_str(stored.as_str()), method);
        }
    }

    #[test]
    fn test_unknown_method_defaults_to_direct() {
        assert_eq!(method_from_str("ocr"), ExtractionMethod::Direct);
    }
}
