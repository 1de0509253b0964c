mod auth;
mod conversation_store;
mod embedding;
mod extractor;
mod fetcher;
mod generative;
mod vector_store;

pub use auth::{AuthService, UserIdentity};
pub use conversation_store::ConversationStore;
pub use embedding::EmbeddingService;
pub use extractor::PdfTextExtractor;
pub use fetcher::DocumentFetcher;
pub use generative::{
    Candidate, Content, GenerateRequest, GenerateResponse, GenerativeModel, InlineData, Part, Role,
    SamplingConfig,
};
pub use vector_store::VectorStore;
