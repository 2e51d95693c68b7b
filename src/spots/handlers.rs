// src/spots/handlers.rs

use axum::extract::{Extension, Json, Query};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use super::models::{SpotSearchParams, SpotSearchResponse};
use crate::common::{ApiError, AppState};

/// GET /api/spots/search - Free-text spot search
///
/// Stateless passthrough to the places API. Every upstream failure maps to
/// the same generic 500; the detail is logged here and never reaches the
/// response body.
pub async fn search_spots_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<SpotSearchParams>,
) -> Result<Json<SpotSearchResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let query = require_query(params)?;

    let places = state
        .places_service
        .text_search(&query)
        .await
        .map_err(|e| {
            error!(error = %e, query = %query, "Places search failed");
            ApiError::Upstream("Failed to search places".to_string())
        })?;

    Ok(Json(SpotSearchResponse { places }))
}

/// A missing `query` parameter is a client error. An empty string is a
/// present parameter and goes upstream like any other.
pub(crate) fn require_query(params: SpotSearchParams) -> Result<String, ApiError> {
    params
        .query
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))
}
