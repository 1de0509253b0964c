//! End-to-end ingestion pipeline tests over the in-memory vector store.

use std::sync::Arc;

use async_trait::async_trait;
use pdf_tutor::application::{IngestionService, SearchService};
use pdf_tutor::domain::entities::{Embedding, ExtractionMethod, PageRecord};
use pdf_tutor::domain::ports::{
    Candidate, Content, EmbeddingService, GenerateRequest, GenerateResponse, GenerativeModel,
    Part, PdfTextExtractor, VectorStore,
};
use pdf_tutor::domain::{chunk_schema, Chunk, ChunkMetadata, DomainError};
use pdf_tutor::infrastructure::InMemoryVectorStore;

const DIMENSION: usize = 8;

/// Deterministic text-derived vectors; identical text embeds identically,
/// so retrieving with a stored chunk's own content ranks it first.
struct HashedEmbedding;

fn embed_text(text: &str) -> Embedding {
    let mut vector = vec![0.0f32; DIMENSION];
    for (i, byte) in text.bytes().enumerate() {
        vector[i % DIMENSION] += byte as f32;
    }
    Embedding::new(vector)
}

#[async_trait]
impl EmbeddingService for HashedEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(embed_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Ok(texts.iter().map(|t| embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}

struct TranscriptModel {
    transcript: String,
}

#[async_trait]
impl GenerativeModel for TranscriptModel {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse, DomainError> {
        Ok(GenerateResponse {
            candidates: vec![Candidate {
                content: Content::model(vec![Part::text(self.transcript.clone())]),
            }],
        })
    }
}

struct ThreePageExtractor;

impl PdfTextExtractor for ThreePageExtractor {
    fn page_count(&self, _bytes: &[u8], _source_path: &str) -> Result<u32, DomainError> {
        Ok(3)
    }

    fn extract_pages(
        &self,
        _bytes: &[u8],
        _source_path: &str,
    ) -> Result<Vec<PageRecord>, DomainError> {
        Ok(vec![
            PageRecord::new(1, "Quadratic equations have two roots."),
            PageRecord::new(2, "The discriminant decides how many are real."),
            PageRecord::new(3, "Completing the square derives the formula."),
        ])
    }
}

fn direct_service(store: Arc<InMemoryVectorStore>) -> IngestionService {
    IngestionService::new(
        Arc::new(ThreePageExtractor),
        Arc::new(TranscriptModel {
            transcript: String::new(),
        }),
        Arc::new(HashedEmbedding),
        store,
    )
}

#[tokio::test]
async fn test_direct_ingestion_tags_chunks_with_page_numbers() {
    let store = Arc::new(InMemoryVectorStore::new());
    let service = direct_service(store.clone());

    let report = service
        .ingest(
            b"%PDF",
            "Algebra Basics",
            "https://x.test/algebra.pdf",
            "AlgebraBasics",
            ExtractionMethod::Direct,
        )
        .await
        .unwrap();

    assert_eq!(report.doc_count, 3);
    assert_eq!(report.extraction_method, ExtractionMethod::Direct);

    let chunks = store.chunks("AlgebraBasics");
    let pages: Vec<u32> = chunks.iter().map(|c| c.metadata.page_number).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.metadata.chunk_index, i as u32);
        assert_eq!(chunk.metadata.source_path, format!("page:{}", i + 1));
    }
}

#[tokio::test]
async fn test_repeat_ingestion_provisions_collection_once() {
    let store = Arc::new(InMemoryVectorStore::new());
    let service = direct_service(store.clone());

    for _ in 0..2 {
        service
            .ingest(
                b"%PDF",
                "Algebra Basics",
                "https://x.test/algebra.pdf",
                "AlgebraBasics",
                ExtractionMethod::Direct,
            )
            .await
            .unwrap();
    }

    assert_eq!(store.collection_count(), 1);
    // Both runs' records accumulated in the single collection.
    assert_eq!(store.record_count("AlgebraBasics"), 6);
    assert!(store.schema("AlgebraBasics").is_some());
}

#[tokio::test]
async fn test_vision_ingestion_marks_document_wide_flags() {
    let transcript = "Intro text.\n\n[IMAGE] A diagram of a parabola.\n\nMore prose follows here.";
    let store = Arc::new(InMemoryVectorStore::new());
    let service = IngestionService::new(
        Arc::new(ThreePageExtractor),
        Arc::new(TranscriptModel {
            transcript: transcript.to_string(),
        }),
        Arc::new(HashedEmbedding),
        store.clone(),
    );

    let report = service
        .ingest(
            b"%PDF",
            "Algebra Basics",
            "https://x.test/algebra.pdf",
            "AlgebraBasics",
            ExtractionMethod::Vision,
        )
        .await
        .unwrap();

    assert!(report.flags.has_images);
    assert!(!report.flags.has_tables);

    let chunks = store.chunks("AlgebraBasics");
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        // Flags describe the whole document, so every chunk carries them.
        assert!(chunk.metadata.has_images);
        assert_eq!(chunk.metadata.page_number, 0);
        assert_eq!(chunk.metadata.extraction_method, ExtractionMethod::Vision);
    }
}

#[tokio::test]
async fn test_write_batch_rejects_count_mismatch() {
    let store = InMemoryVectorStore::new();
    let chunk = Chunk::new(
        "text",
        ChunkMetadata {
            book_title: "t".into(),
            source_path: "page:1".into(),
            page_number: 1,
            chunk_index: 0,
            extraction_method: ExtractionMethod::Direct,
            has_images: false,
            has_tables: false,
            has_formulas: false,
        },
    );

    let err = store
        .write_batch("Books", &[chunk], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(store.record_count("Books"), 0);
}

#[tokio::test]
async fn test_search_returns_matching_chunk_first() {
    let store = Arc::new(InMemoryVectorStore::new());
    let service = direct_service(store.clone());
    service
        .ingest(
            b"%PDF",
            "Algebra Basics",
            "https://x.test/algebra.pdf",
            "AlgebraBasics",
            ExtractionMethod::Direct,
        )
        .await
        .unwrap();

    let search = SearchService::new(Arc::new(HashedEmbedding), store, 5);
    let results = search
        .retrieve("The discriminant decides how many are real.", "AlgebraBasics")
        .await
        .unwrap();

    assert!(!results.is_empty());
    assert_eq!(results[0].chunk.metadata.page_number, 2);
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_schema_carries_every_metadata_property() {
    let store = Arc::new(InMemoryVectorStore::new());
    let service = direct_service(store.clone());
    service
        .ingest(
            b"%PDF",
            "Algebra Basics",
            "https://x.test/algebra.pdf",
            "AlgebraBasics",
            ExtractionMethod::Direct,
        )
        .await
        .unwrap();

    let schema = store.schema("AlgebraBasics").unwrap();
    let expected = chunk_schema(DIMENSION);
    assert_eq!(schema.dimension, DIMENSION);
    for property in &expected.properties {
        assert!(
            schema.property(property.name).is_some(),
            "missing {}",
            property.name
        );
    }
}
