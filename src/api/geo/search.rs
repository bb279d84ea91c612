//! Free-text place search

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::SEARCH_CACHE_CONTROL;
use crate::api::state::AppState;
use crate::api::types::ApiError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// GET /api/search?query=
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let query = params
        .query
        .ok_or_else(|| ApiError::bad_request("Query parameter 'query' is required"))?;

    debug!(query = %query, "Searching places");

    let matches = state
        .search_service
        .search(&query)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to search Nominatim API"))?;

    Ok(([(header::CACHE_CONTROL, SEARCH_CACHE_CONTROL)], Json(matches)))
}
