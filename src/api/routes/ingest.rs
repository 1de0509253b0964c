use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::domain::{format_collection_name, ExtractionMethod};

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub pdf_url: String,
    pub collection: String,
    pub title: Option<String>,
    #[serde(default = "default_method")]
    pub method: ExtractionMethod,
}

fn default_method() -> ExtractionMethod {
    ExtractionMethod::Direct
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_count: Option<usize>,
}

/// Ingestion failures come back as `{ok: false, error}` rather than an
/// HTTP error status, so callers always get a diagnosable body.
pub async fn ingest_pdf(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Json<IngestResponse> {
    let collection = format_collection_name(&request.collection);
    let title = request
        .title
        .clone()
        .unwrap_or_else(|| title_from_url(&request.pdf_url));

    let result = async {
        let bytes = state.fetcher.fetch(&request.pdf_url).await?;
        state
            .ingestion
            .ingest(&bytes, &title, &request.pdf_url, &collection, request.method)
            .await
    }
    .await;

    match result {
        Ok(report) => Json(IngestResponse {
            ok: true,
            message: Some(format!(
                "Ingested '{}' into '{}'",
                report.pdf, report.collection
            )),
            error: None,
            pdf: Some(report.pdf),
            collection: Some(report.collection),
            doc_count: Some(report.doc_count),
        }),
        Err(e) => {
            tracing::error!(pdf_url = %request.pdf_url, error = %e, "ingestion failed");
            Json(IngestResponse {
                ok: false,
                message: None,
                error: Some(e.to_string()),
                pdf: None,
                collection: Some(collection),
                doc_count: None,
            })
        }
    }
}

fn title_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches(".pdf").to_string())
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_url_strips_path_and_extension() {
        assert_eq!(title_from_url("https://x.test/books/algebra.pdf"), "algebra");
    }

    #[test]
    fn test_title_from_url_trailing_slash_falls_back() {
        assert_eq!(title_from_url("https://x.test/"), "https://x.test/");
    }

    #[test]
    fn test_method_defaults_to_direct() {
        let request: IngestRequest = serde_json::from_value(serde_json::json!({
            "pdf_url": "https://x.test/a.pdf",
            "collection": "my lesson"
        }))
        .unwrap();
        assert_eq!(request.method, ExtractionMethod::Direct);
    }
}
