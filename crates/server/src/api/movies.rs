//! Movie catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use vodo_core::{FetchFilters, FetchResult, ProviderInfo, QueryError};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query failure mapped onto an HTTP status.
pub struct ApiError(QueryError);

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryError::Sync(_) => StatusCode::BAD_GATEWAY,
            QueryError::InvalidKeywords(_) => StatusCode::BAD_REQUEST,
            QueryError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/provider
///
/// Descriptive provider metadata.
pub async fn get_provider(State(state): State<Arc<AppState>>) -> Json<ProviderInfo> {
    Json(state.provider().info().clone())
}

/// GET /api/v1/movies
///
/// One page of movies. The first request triggers the feed sync.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<FetchFilters>,
) -> Result<Json<FetchResult>, ApiError> {
    match state.provider().fetch(&filters).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            warn!(error = %e, "Movie fetch failed");
            Err(e.into())
        }
    }
}

/// POST /api/v1/movies/{id}/detail
///
/// Echo back the host's existing data for the movie.
pub async fn get_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(previous): Json<Value>,
) -> Json<Value> {
    Json(state.provider().detail(&id, previous))
}
