mod collection;
mod conversation;
mod document;
mod embedding;

pub use collection::{
    chunk_schema, format_collection_name, CollectionSchema, PropertySpec, PropertyType,
};
pub use conversation::{ConversationTurn, QaResult};
pub use document::{
    Chunk, ChunkMetadata, ContentFlags, Document, ExtractionMethod, IngestReport, PageRecord,
    SearchResult,
};
pub use embedding::Embedding;
