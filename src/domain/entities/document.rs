use serde::{Deserialize, Serialize};

/// How the document text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Embedded text read page by page.
    Direct,
    /// Whole-document transcript from a multimodal model, including
    /// image/table/formula descriptions.
    Vision,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Vision => "vision",
        }
    }
}

/// One PDF handed to the ingestion pipeline. Only its chunks persist;
/// the document itself is discarded after chunk production.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub source_path: String,
    pub method: ExtractionMethod,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        source_path: impl Into<String>,
        method: ExtractionMethod,
    ) -> Self {
        Self {
            title: title.into(),
            source_path: source_path.into(),
            method,
        }
    }
}

/// One page's raw text. Produced by the extractor, consumed by the chunker,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub page_number: u32,
    pub text: String,
}

impl PageRecord {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }

    pub fn source_path(&self) -> String {
        format!("page:{}", self.page_number)
    }
}

/// A bounded span of extracted text plus provenance metadata, the unit of
/// storage and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// Metadata fields are always present in the persisted record: unknown page
/// numbers default to 0, never null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub book_title: String,
    pub source_path: String,
    pub page_number: u32,
    pub chunk_index: u32,
    pub extraction_method: ExtractionMethod,
    pub has_images: bool,
    pub has_tables: bool,
    pub has_formulas: bool,
}

/// Section tags the vision transcript uses; flags are derived by checking
/// the whole extracted text, not individual chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFlags {
    pub has_images: bool,
    pub has_tables: bool,
    pub has_formulas: bool,
}

impl ContentFlags {
    pub fn detect(text: &str) -> Self {
        Self {
            has_images: text.contains("[IMAGE]"),
            has_tables: text.contains("[TABLE]"),
            has_formulas: text.contains("[FORMULA]"),
        }
    }
}

/// Outcome of one successful ingestion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub pdf: String,
    pub collection: String,
    pub doc_count: usize,
    pub extraction_method: ExtractionMethod,
    pub flags: ContentFlags,
}

/// Similarity search hit from the optional retrieval path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}
