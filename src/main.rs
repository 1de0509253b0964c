use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pdf_tutor::api::{create_router, AppState};
use pdf_tutor::application::{IngestionService, QaService, SearchService};
use pdf_tutor::infrastructure::{
    AppConfig, GeminiClient, GeminiEmbedding, HttpFetcher, LopdfExtractor, QdrantVectorStore,
    SupabaseAuth, SupabaseConversationStore,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_tutor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::from_env();

    let api_key = AppConfig::gemini_api_key()
        .ok_or_else(|| anyhow::anyhow!("GOOGLE_API_KEY or GEMINI_API_KEY must be set"))?;

    let extractor = Arc::new(LopdfExtractor::new());
    let generative = Arc::new(
        GeminiClient::new(api_key, &config.llm.model).with_api_base(&config.llm.api_base),
    );
    let embedding = Arc::new(GeminiEmbedding::from_config(&config.embedding));
    let vector_store = Arc::new(QdrantVectorStore::new(&config.qdrant_url)?);
    info!(url = %config.qdrant_url, "vector store client initialized");

    let conversations = Arc::new(
        SupabaseConversationStore::new(&config.supabase.url, &config.supabase.anon_key)
            .with_table(&config.supabase.chats_table),
    );
    let auth = Arc::new(SupabaseAuth::new(
        &config.supabase.url,
        &config.supabase.anon_key,
    ));
    let call_timeout = Duration::from_secs(config.limits.call_timeout_seconds);
    let fetcher = Arc::new(HttpFetcher::new().with_timeout(call_timeout));
    let ingestion = Arc::new(
        IngestionService::new(
            extractor.clone(),
            generative.clone(),
            embedding.clone(),
            vector_store.clone(),
        )
        .with_max_concurrent_calls(config.limits.max_concurrent_model_calls)
        .with_call_timeout(call_timeout),
    );
    let qa = Arc::new(
        QaService::new(
            generative,
            conversations,
            fetcher.clone(),
            extractor,
        )
        .with_call_timeout(call_timeout),
    );
    let search = Arc::new(SearchService::new(embedding, vector_store.clone(), 5));

    let state = AppState::new(
        ingestion,
        qa,
        search,
        auth,
        fetcher,
        vector_store,
        config.clone(),
    );
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
