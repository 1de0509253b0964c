//! Recursive character splitting with overlap.
//!
//! The splitter prefers to break at higher-level separators first (page
//! breaks, blank lines, newlines, spaces) and falls back to hard character
//! cuts only when no separator fits inside the window. Output is
//! deterministic: identical input and parameters always produce identical
//! chunk boundaries. All sizes are measured in characters, not bytes.

use crate::domain::entities::{Chunk, ChunkMetadata, ContentFlags, Document, PageRecord};

/// Page delimiter emitted by the vision transcript format.
pub const PAGE_BREAK: &str = "\n\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\n";

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DIRECT_OVERLAP: usize = 400;
pub const VISION_OVERLAP: usize = 150;

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
    separators: Vec<&'static str>,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, overlap: usize, separators: Vec<&'static str>) -> Self {
        debug_assert!(overlap < chunk_size);
        Self {
            chunk_size,
            overlap,
            separators,
        }
    }

    /// Splitter for page-level direct extraction.
    pub fn for_pages() -> Self {
        Self::new(
            DEFAULT_CHUNK_SIZE,
            DIRECT_OVERLAP,
            vec!["\n\n", "\n", " "],
        )
    }

    /// Splitter for whole-document vision transcripts.
    pub fn for_transcript() -> Self {
        Self::new(
            DEFAULT_CHUNK_SIZE,
            VISION_OVERLAP,
            vec![PAGE_BREAK, "\n\n", "\n", " "],
        )
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Splits `text` into chunks of at most `chunk_size` fresh characters,
    /// each chunk after the first carrying the trailing `overlap` characters
    /// of its predecessor. Every character of the input appears in at least
    /// one chunk.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let pieces = self.split_pieces(text, &self.separators);
        self.merge(pieces)
    }

    fn split_pieces(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let Some((sep, rest)) = separators.split_first() else {
            return hard_cut(text, self.chunk_size);
        };
        if !text.contains(sep) {
            return self.split_pieces(text, rest);
        }

        let mut pieces = Vec::new();
        for fragment in text.split_inclusive(sep) {
            if fragment.chars().count() > self.chunk_size {
                pieces.extend(self.split_pieces(fragment, rest));
            } else {
                pieces.push(fragment.to_string());
            }
        }
        pieces
    }

    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        // Characters added since the carried overlap; a chunk is only
        // emitted once it holds fresh text, so merging always terminates.
        let mut fresh = 0usize;

        for piece in pieces {
            let piece_len = piece.chars().count();
            if fresh > 0 && current_len + piece_len > self.chunk_size {
                chunks.push(current.clone());
                current = overlap_tail(&current, self.overlap);
                current_len = current.chars().count();
                fresh = 0;
            }
            current.push_str(&piece);
            current_len += piece_len;
            fresh += piece_len;
        }

        if fresh > 0 {
            chunks.push(current);
        }
        chunks
    }
}

fn hard_cut(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn overlap_tail(s: &str, overlap: usize) -> String {
    let count = s.chars().count();
    if count <= overlap {
        return s.to_string();
    }
    s.chars().skip(count - overlap).collect()
}

/// Chunks page records from direct extraction, one split pass per page so
/// chunks never span a page boundary and carry the right page number.
/// Content flags are document-level: derived from the whole extracted text
/// and copied onto every chunk.
pub fn chunk_pages(
    doc: &Document,
    pages: &[PageRecord],
    splitter: &TextSplitter,
    flags: ContentFlags,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut chunk_index = 0u32;

    for page in pages {
        for content in splitter.split(&page.text) {
            chunks.push(Chunk::new(
                content,
                ChunkMetadata {
                    book_title: doc.title.clone(),
                    source_path: page.source_path(),
                    page_number: page.page_number,
                    chunk_index,
                    extraction_method: doc.method,
                    has_images: flags.has_images,
                    has_tables: flags.has_tables,
                    has_formulas: flags.has_formulas,
                },
            ));
            chunk_index += 1;
        }
    }
    chunks
}

/// Chunks a whole-document vision transcript. Page numbers are unknown here
/// and default to 0; chunk_index carries ordering instead.
pub fn chunk_transcript(
    doc: &Document,
    transcript: &str,
    splitter: &TextSplitter,
    flags: ContentFlags,
) -> Vec<Chunk> {
    splitter
        .split(transcript)
        .into_iter()
        .enumerate()
        .map(|(index, content)| {
            Chunk::new(
                content,
                ChunkMetadata {
                    book_title: doc.title.clone(),
                    source_path: doc.source_path.clone(),
                    page_number: 0,
                    chunk_index: index as u32,
                    extraction_method: doc.method,
                    has_images: flags.has_images,
                    has_tables: flags.has_tables,
                    has_formulas: flags.has_formulas,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ExtractionMethod;

    fn doc() -> Document {
        Document::new("book.pdf", "/tmp/book.pdf", ExtractionMethod::Direct)
    }

    #[test]
    fn test_short_text_single_chunk() {
        let splitter = TextSplitter::new(100, 20, vec!["\n\n", "\n", " "]);
        let chunks = splitter.split("Hello world.");
        assert_eq!(chunks, vec!["Hello world.".to_string()]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        let splitter = TextSplitter::for_pages();
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn test_prefers_blank_line_boundaries() {
        let splitter = TextSplitter::new(30, 5, vec!["\n\n", "\n", " "]);
        let text = "First paragraph here.\n\nSecond paragraph here.";
        let chunks = splitter.split(text);
        assert!(chunks.len() >= 2);
        assert!(chunks[0].starts_with("First paragraph here."));
        assert!(chunks.last().unwrap().ends_with("Second paragraph here."));
    }

    #[test]
    fn test_overlap_repeats_previous_tail() {
        let splitter = TextSplitter::new(20, 8, vec![" "]);
        let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail: String = {
                let count = pair[0].chars().count();
                pair[0].chars().skip(count.saturating_sub(8)).collect()
            };
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn test_coverage_every_character_appears() {
        let splitter = TextSplitter::new(50, 10, vec!["\n\n", "\n", " "]);
        let text = "word ".repeat(100);
        let chunks = splitter.split(&text);

        // Strip each chunk's carried overlap; the remainder must rebuild the
        // original text exactly.
        let mut rebuilt = chunks[0].clone();
        for pair in chunks.windows(2) {
            let prev_count = pair[0].chars().count();
            let carried = prev_count.min(10);
            let tail: String = pair[0].chars().skip(prev_count - carried).collect();
            assert!(pair[1].starts_with(&tail));
            rebuilt.push_str(&pair[1][tail.len()..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_hard_cut_without_separators() {
        let splitter = TextSplitter::new(10, 3, vec!["\n\n", "\n", " "]);
        let text = "x".repeat(25);
        let chunks = splitter.split(&text);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_multibyte_safe() {
        let splitter = TextSplitter::new(10, 3, vec![" "]);
        let text = "\u{65e5}\u{672c}\u{8a9e}".repeat(12);
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);
    }

    #[test]
    fn test_deterministic() {
        let splitter = TextSplitter::for_transcript();
        let text = format!("page one text{PAGE_BREAK}page two text\n\nmore text");
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn test_chunk_pages_tags_page_numbers() {
        let pages = vec![
            PageRecord::new(1, "alpha"),
            PageRecord::new(2, "beta"),
            PageRecord::new(3, "gamma"),
        ];
        let chunks = chunk_pages(
            &doc(),
            &pages,
            &TextSplitter::for_pages(),
            ContentFlags::default(),
        );
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks.iter().map(|c| c.metadata.page_number).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(chunks[1].metadata.source_path, "page:2");
        assert_eq!(
            chunks.iter().map(|c| c.metadata.chunk_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_chunk_transcript_flags_are_document_wide() {
        // Flags are derived from the whole transcript, so even a chunk
        // with no [IMAGE] tag of its own is marked has_images.
        let transcript = format!("plain text only{PAGE_BREAK}[IMAGE] a diagram of a cell");
        let flags = ContentFlags::detect(&transcript);
        let doc = Document::new("bio.pdf", "/tmp/bio.pdf", ExtractionMethod::Vision);
        let chunks = chunk_transcript(&doc, &transcript, &TextSplitter::for_transcript(), flags);

        assert!(chunks.iter().all(|c| c.metadata.has_images));
        assert!(chunks.iter().all(|c| !c.metadata.has_tables));
        assert_eq!(chunks[0].metadata.page_number, 0);
    }
}
