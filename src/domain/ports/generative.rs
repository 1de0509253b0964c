use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// One role-tagged message in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Role::Model,
            parts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A part is either inline text or inline binary data with a MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineData(InlineData),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn pdf(base64_data: impl Into<String>) -> Self {
        Self::InlineData(InlineData {
            mime_type: "application/pdf".to_string(),
            data: base64_data.into(),
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::InlineData(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl SamplingConfig {
    /// Sampling for the conversational QA loop.
    pub fn qa() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: None,
        }
    }

    /// Lower-temperature sampling for vision transcript extraction.
    pub fn vision_extraction() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: Some(8192),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// The first candidate's first text part, or `EmptyResponse` when the
    /// model returned nothing usable. Never defaults silently.
    pub fn first_text(&self) -> Result<&str, DomainError> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .and_then(Part::as_text)
            .ok_or(DomainError::EmptyResponse)
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_returns_leading_text_part() {
        let response = GenerateResponse {
            candidates: vec![Candidate {
                content: Content::model(vec![Part::text("answer"), Part::text("extra")]),
            }],
        };
        assert_eq!(response.first_text().unwrap(), "answer");
    }

    #[test]
    fn test_first_text_empty_candidates_is_an_error() {
        let response = GenerateResponse { candidates: vec![] };
        assert!(matches!(
            response.first_text(),
            Err(DomainError::EmptyResponse)
        ));
    }

    #[test]
    fn test_first_text_inline_data_part_is_an_error() {
        let response = GenerateResponse {
            candidates: vec![Candidate {
                content: Content::model(vec![Part::pdf("aGVsbG8=")]),
            }],
        };
        assert!(matches!(
            response.first_text(),
            Err(DomainError::EmptyResponse)
        ));
    }
}
