use std::sync::Arc;

use crate::application::{IngestionService, QaService, SearchService};
use crate::domain::ports::{AuthService, DocumentFetcher, VectorStore};
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionService>,
    pub qa: Arc<QaService>,
    pub search: Arc<SearchService>,
    pub auth: Arc<dyn AuthService>,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub vector_store: Arc<dyn VectorStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ingestion: Arc<IngestionService>,
        qa: Arc<QaService>,
        search: Arc<SearchService>,
        auth: Arc<dyn AuthService>,
        fetcher: Arc<dyn DocumentFetcher>,
        vector_store: Arc<dyn VectorStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            ingestion,
            qa,
            search,
            auth,
            fetcher,
            vector_store,
            config: Arc::new(config),
        }
    }
}
