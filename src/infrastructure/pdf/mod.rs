use lopdf::Document as PdfDocument;
use tracing::debug;

use crate::domain::entities::PageRecord;
use crate::domain::errors::DomainError;
use crate::domain::ports::PdfTextExtractor;

/// Text-layer extraction backed by lopdf. One record per page, in page
/// order, with whitespace collapsed to single spaces.
pub struct LopdfExtractor;

impl LopdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn load(&self, bytes: &[u8], source_path: &str) -> Result<PdfDocument, DomainError> {
        PdfDocument::load_mem(bytes)
            .map_err(|e| DomainError::extraction(source_path, format!("failed to parse PDF: {e}")))
    }
}

impl Default for LopdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTextExtractor for LopdfExtractor {
    fn page_count(&self, bytes: &[u8], source_path: &str) -> Result<u32, DomainError> {
        let doc = self.load(bytes, source_path)?;
        Ok(doc.get_pages().len() as u32)
    }

    fn extract_pages(&self, bytes: &[u8], source_path: &str) -> Result<Vec<PageRecord>, DomainError> {
        let doc = self.load(bytes, source_path)?;
        let pages = doc.get_pages();
        let mut records = Vec::with_capacity(pages.len());
        // get_pages keys are 1-based page numbers in a BTreeMap, so
        // iteration order is already document order.
        for &number in pages.keys() {
            let raw = doc.extract_text(&[number]).map_err(|e| {
                DomainError::extraction(source_path, format!("page {number}: {e}"))
            })?;
            records.push(PageRecord::new(number, normalize_page_text(&raw)));
        }
        debug!(source_path, pages = records.len(), "extracted text layer");
        Ok(records)
    }
}

/// Collapse runs of whitespace (including the newlines lopdf inserts
/// between text runs) into single spaces.
fn normalize_page_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
