mod auth;
mod conversations;

pub use auth::SupabaseAuth;
pub use conversations::SupabaseConversationStore;
