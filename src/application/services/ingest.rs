use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::application::prompts::VISION_EXTRACTION_PROMPT;
use crate::domain::chunking::{chunk_pages, chunk_transcript, TextSplitter};
use crate::domain::ports::{
    Content, EmbeddingService, GenerateRequest, GenerativeModel, Part, PdfTextExtractor,
    SamplingConfig, VectorStore,
};
use crate::domain::{
    chunk_schema, Chunk, ContentFlags, Document, DomainError, ExtractionMethod, IngestReport,
};

/// Orchestrates the ingestion pipeline: extract, chunk, provision the
/// collection, embed, and write. One call owns its document data
/// exclusively until it is handed to the vector store.
pub struct IngestionService {
    extractor: Arc<dyn PdfTextExtractor>,
    generative: Arc<dyn GenerativeModel>,
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    /// Bounds concurrent embedding/generation calls; the external providers
    /// enforce rate limits.
    limiter: Arc<Semaphore>,
    call_timeout: Duration,
    direct_splitter: TextSplitter,
    vision_splitter: TextSplitter,
}

impl IngestionService {
    pub fn new(
        extractor: Arc<dyn PdfTextExtractor>,
        generative: Arc<dyn GenerativeModel>,
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            extractor,
            generative,
            embedding,
            vector_store,
            limiter: Arc::new(Semaphore::new(4)),
            call_timeout: Duration::from_secs(120),
            direct_splitter: TextSplitter::for_pages(),
            vision_splitter: TextSplitter::for_transcript(),
        }
    }

    pub fn with_max_concurrent_calls(mut self, permits: usize) -> Self {
        self.limiter = Arc::new(Semaphore::new(permits.max(1)));
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_splitters(mut self, direct: TextSplitter, vision: TextSplitter) -> Self {
        self.direct_splitter = direct;
        self.vision_splitter = vision;
        self
    }

    #[instrument(skip(self, bytes), fields(title, collection, ?method))]
    pub async fn ingest(
        &self,
        bytes: &[u8],
        title: &str,
        source_path: &str,
        collection: &str,
        method: ExtractionMethod,
    ) -> Result<IngestReport, DomainError> {
        match method {
            ExtractionMethod::Direct => {
                self.ingest_direct(bytes, title, source_path, collection).await
            }
            ExtractionMethod::Vision => {
                self.ingest_vision(bytes, title, source_path, collection).await
            }
        }
    }

    /// Direct mode: embedded text read page by page, chunked per page so
    /// chunks keep their page numbers.
    pub async fn ingest_direct(
        &self,
        bytes: &[u8],
        title: &str,
        source_path: &str,
        collection: &str,
    ) -> Result<IngestReport, DomainError> {
        let pages = self.extractor.extract_pages(bytes, source_path)?;
        info!(page_count = pages.len(), source_path, "extracted pages");

        let full_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let flags = ContentFlags::detect(&full_text);

        let doc = Document::new(title, source_path, ExtractionMethod::Direct);
        let chunks = chunk_pages(&doc, &pages, &self.direct_splitter, flags);

        self.store_chunks(&doc, chunks, collection, flags).await
    }

    /// Vision mode: the whole PDF goes to the multimodal model as inline
    /// data; the returned transcript is the document text.
    pub async fn ingest_vision(
        &self,
        bytes: &[u8],
        title: &str,
        source_path: &str,
        collection: &str,
    ) -> Result<IngestReport, DomainError> {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        let request = GenerateRequest {
            contents: vec![Content::user(vec![
                Part::text(VISION_EXTRACTION_PROMPT),
                Part::pdf(data),
            ])],
            sampling: SamplingConfig::vision_extraction(),
        };

        let response = {
            let _permit = self.limiter.acquire().await.map_err(|e| {
                DomainError::internal(format!("rate limiter closed: {e}"))
            })?;
            self.with_deadline(self.generative.generate(request), || {
                DomainError::model("vision extraction timed out")
            })
            .await?
        };
        let transcript = response.first_text()?.to_string();
        info!(
            transcript_chars = transcript.chars().count(),
            source_path, "vision transcript extracted"
        );

        let flags = ContentFlags::detect(&transcript);
        let doc = Document::new(title, source_path, ExtractionMethod::Vision);
        let chunks = chunk_transcript(&doc, &transcript, &self.vision_splitter, flags);

        self.store_chunks(&doc, chunks, collection, flags).await
    }

    async fn store_chunks(
        &self,
        doc: &Document,
        chunks: Vec<Chunk>,
        collection: &str,
        flags: ContentFlags,
    ) -> Result<IngestReport, DomainError> {
        self.ensure_collection(collection).await;

        if chunks.is_empty() {
            info!(collection, "no chunks produced, nothing to write");
            return Ok(IngestReport {
                pdf: doc.title.clone(),
                collection: collection.to_string(),
                doc_count: 0,
                extraction_method: doc.method,
                flags,
            });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = {
            let _permit = self.limiter.acquire().await.map_err(|e| {
                DomainError::internal(format!("rate limiter closed: {e}"))
            })?;
            self.with_deadline(self.embedding.embed_batch(&texts), || {
                DomainError::model("embedding call timed out")
            })
            .await?
        };

        let written = self
            .with_deadline(
                self.vector_store.write_batch(collection, &chunks, &embeddings),
                || DomainError::store_write(collection, "bulk write timed out"),
            )
            .await?;

        info!(collection, doc_count = written, pdf = %doc.title, "chunks stored");
        Ok(IngestReport {
            pdf: doc.title.clone(),
            collection: collection.to_string(),
            doc_count: written,
            extraction_method: doc.method,
            flags,
        })
    }

    /// Idempotent check-then-create. Provisioning failures are logged and
    /// ingestion continues to the write step: the collection may already
    /// exist or have been created concurrently.
    async fn ensure_collection(&self, collection: &str) {
        let result = async {
            if self.vector_store.exists(collection).await? {
                info!(collection, "collection already exists");
                return Ok(());
            }
            let schema = chunk_schema(self.embedding.dimension());
            self.vector_store.create_collection(collection, &schema).await?;
            info!(collection, "collection created");
            Ok::<(), DomainError>(())
        }
        .await;

        if let Err(e) = result {
            let soft = DomainError::schema_provision(collection, e.to_string());
            warn!(collection, error = %soft, "schema check/create failed, continuing");
        }
    }

    async fn with_deadline<T, F>(
        &self,
        fut: F,
        on_expiry: impl FnOnce() -> DomainError,
    ) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_expiry()),
        }
    }
}
