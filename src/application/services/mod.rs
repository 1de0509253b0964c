mod ingest;
mod qa;
mod search;

pub use ingest::IngestionService;
pub use qa::{QaService, HISTORY_WINDOW};
pub use search::SearchService;
