use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::errors::DomainError;
use crate::domain::ports::{
    Candidate, Content, GenerateRequest, GenerateResponse, GenerativeModel, SamplingConfig,
};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` client over plain HTTP. The REST surface is
/// used directly because requests may carry inline PDF bytes alongside
/// text parts.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Point the client at a different endpoint, e.g. a local mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: &'a [Content],
    generation_config: &'a SamplingConfig,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, DomainError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let body = WireRequest {
            contents: &request.contents,
            generation_config: &request.sampling,
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::model(format!("generateContent request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::model(format!(
                "generateContent returned {status}: {detail}"
            )));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| DomainError::model(format!("malformed generateContent response: {e}")))?;
        debug!(candidates = wire.candidates.len(), "generateContent ok");
        Ok(GenerateResponse {
            candidates: wire.candidates,
        })
    }
}
