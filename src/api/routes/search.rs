use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::routes::ask::{error_response, ErrorResponse};
use crate::api::state::AppState;
use crate::domain::SearchResult;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub collection: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

pub async fn search_chunks(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let result = match request.limit {
        Some(limit) => {
            state
                .search
                .retrieve_top_k(&request.query, &request.collection, limit)
                .await
        }
        None => state.search.retrieve(&request.query, &request.collection).await,
    };

    result
        .map(|results| Json(SearchResponse { results }))
        .map_err(|e| {
            tracing::error!(error = %e, "chunk search failed");
            error_response(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_limit_is_optional() {
        let request: SearchRequest = serde_json::from_value(serde_json::json!({
            "query": "what is a derivative",
            "collection": "Calculus"
        }))
        .unwrap();
        assert!(request.limit.is_none());

        let request: SearchRequest = serde_json::from_value(serde_json::json!({
            "query": "what is a derivative",
            "collection": "Calculus",
            "limit": 3
        }))
        .unwrap();
        assert_eq!(request.limit, Some(3));
    }
}
