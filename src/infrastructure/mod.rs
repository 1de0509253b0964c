//! Infrastructure layer - concrete adapters behind the domain ports.

pub mod config;
pub mod embedding;
pub mod fetch;
pub mod llm;
pub mod pdf;
pub mod supabase;
pub mod vector_store;

pub use config::AppConfig;
pub use embedding::GeminiEmbedding;
pub use fetch::HttpFetcher;
pub use llm::GeminiClient;
pub use pdf::LopdfExtractor;
pub use supabase::{SupabaseAuth, SupabaseConversationStore};
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
