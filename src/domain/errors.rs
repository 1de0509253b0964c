use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Extraction failed for {source_path}: {message}")]
    Extraction { source_path: String, message: String },

    #[error("Failed to fetch document {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Schema provisioning error for collection '{collection}': {message}")]
    SchemaProvision { collection: String, message: String },

    #[error("Vector store write failed for collection '{collection}': {message}")]
    StoreWrite { collection: String, message: String },

    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Model returned no usable candidates")]
    EmptyResponse,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn extraction(source_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            source_path: source_path.into(),
            message: message.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn schema_provision(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaProvision {
            collection: collection.into(),
            message: message.into(),
        }
    }

    pub fn store_write(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreWrite {
            collection: collection.into(),
            message: message.into(),
        }
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelInvocation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
