//! Drinking water points within a bounding box

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use super::FOUNTAINS_CACHE_CONTROL;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::geo::BoundingBox;

/// GET /api/fountains/{start_lng}/{start_lat}/{end_lng}/{end_lat}
pub async fn get_fountains(
    State(state): State<AppState>,
    path: Result<Path<(f64, f64, f64, f64)>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path((start_lng, start_lat, end_lng, end_lat)) = path.map_err(|rejection| {
        ApiError::bad_request(format!("Invalid coordinates: {}", rejection.body_text()))
    })?;

    let bbox = BoundingBox::new(start_lng, start_lat, end_lng, end_lat);
    debug!(?bbox, "Getting fountains");

    let result = state
        .elements_service
        .get_elements(&bbox)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to get elements from Overpass API"))?;

    Ok(([(header::CACHE_CONTROL, FOUNTAINS_CACHE_CONTROL)], Json(result)))
}
