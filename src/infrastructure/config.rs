use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub qdrant_url: String,
    pub default_collection: String,
    pub supabase: SupabaseConfig,
    pub limits: LimitsConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub chats_table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub call_timeout_seconds: u64,
    pub max_concurrent_model_calls: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            llm: LlmConfig {
                model: "gemini-2.5-flash-lite".to_string(),
                api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            },
            embedding: EmbeddingConfig {
                model: "gemini-embedding-001".to_string(),
                dimension: 3072,
            },
            qdrant_url: "http://localhost:6334".to_string(),
            default_collection: "default_books_index".to_string(),
            supabase: SupabaseConfig {
                url: "http://localhost:54321".to_string(),
                anon_key: String::new(),
                chats_table: "chats".to_string(),
            },
            limits: LimitsConfig {
                call_timeout_seconds: 120,
                max_concurrent_model_calls: 4,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
        }
    }
}

impl AppConfig {
    /// Environment-backed configuration; every field falls back to its
    /// default when the variable is unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", defaults.server.host),
                port: env_parse_or("SERVER_PORT", defaults.server.port),
            },
            llm: LlmConfig {
                model: env_or("GEMINI_CHAT_MODEL", defaults.llm.model),
                api_base: env_or("GEMINI_API_BASE", defaults.llm.api_base),
            },
            embedding: EmbeddingConfig {
                model: env_or("GEMINI_EMBEDDING_MODEL", defaults.embedding.model),
                dimension: env_parse_or("EMBEDDING_DIMENSION", defaults.embedding.dimension),
            },
            qdrant_url: env_or("QDRANT_URL", defaults.qdrant_url),
            default_collection: env_or("DEFAULT_COLLECTION", defaults.default_collection),
            supabase: SupabaseConfig {
                url: env_or("SUPABASE_URL", defaults.supabase.url),
                anon_key: env_or("SUPABASE_ANON_KEY", defaults.supabase.anon_key),
                chats_table: env_or("SUPABASE_CHATS_TABLE", defaults.supabase.chats_table),
            },
            limits: LimitsConfig {
                call_timeout_seconds: env_parse_or(
                    "CALL_TIMEOUT_SECONDS",
                    defaults.limits.call_timeout_seconds,
                ),
                max_concurrent_model_calls: env_parse_or(
                    "MAX_CONCURRENT_MODEL_CALLS",
                    defaults.limits.max_concurrent_model_calls,
                ),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or(defaults.cors.allowed_origins),
            },
        }
    }

    /// GOOGLE_API_KEY with GEMINI_API_KEY as a fallback, matching the
    /// provider's own conventions.
    pub fn gemini_api_key() -> Option<String> {
        std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
