//! Geodata endpoints

pub mod fountains;
pub mod search;

use axum::{routing::get, Router};

use super::state::AppState;

/// Cache policy for spatial responses
pub const FOUNTAINS_CACHE_CONTROL: &str = "public, max-age=3600, stale-while-revalidate=86400";

/// Cache policy for search responses
pub const SEARCH_CACHE_CONTROL: &str = "public, max-age=86400, stale-while-revalidate=86400";

/// Geodata routes, mounted under `/api`
pub fn create_geo_router() -> Router<AppState> {
    Router::new()
        .route(
            "/fountains/{start_lng}/{start_lat}/{end_lng}/{end_lat}",
            get(fountains::get_fountains),
        )
        // legacy path used by older frontends
        .route(
            "/{start_lng}/{start_lat}/{end_lng}/{end_lat}",
            get(fountains::get_fountains),
        )
        .route("/search", get(search::search))
}
