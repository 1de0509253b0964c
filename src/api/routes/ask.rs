use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::{DomainError, QaResult};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub collection: String,
    pub conversation_id: Option<Uuid>,
    pub pdf_url: String,
    pub current_page: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub async fn ask_question(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<QaResult>, (StatusCode, Json<ErrorResponse>)> {
    if request.question.trim().is_empty() {
        return Err(error_response(DomainError::validation(
            "question must not be empty",
        )));
    }

    state
        .qa
        .answer(
            &request.question,
            &request.collection,
            request.conversation_id,
            &request.pdf_url,
            request.current_page,
        )
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "question answering failed");
            error_response(e)
        })
}

pub fn error_response(e: DomainError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Fetch { .. }
        | DomainError::ModelInvocation(_)
        | DomainError::EmptyResponse => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_mapping() {
        let (status, _) = error_response(DomainError::validation("bad"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(DomainError::fetch("http://x", "down"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = error_response(DomainError::internal("boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
