use crate::domain::entities::PageRecord;
use crate::domain::errors::DomainError;

/// Direct text extraction from PDF bytes. Pure and restartable: the same
/// bytes always yield the same ordered page sequence.
pub trait PdfTextExtractor: Send + Sync {
    fn page_count(&self, bytes: &[u8], source_path: &str) -> Result<u32, DomainError>;

    /// Ordered page-level text, pages 1..=N. Fails with an extraction error
    /// naming `source_path` when the PDF cannot be read; no partial results.
    fn extract_pages(&self, bytes: &[u8], source_path: &str)
        -> Result<Vec<PageRecord>, DomainError>;
}
