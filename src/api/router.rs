use std::path::Path;

use axum::{middleware, routing::get, Router};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::geo;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::types::ApiError;

/// Create the API router with application state
pub fn create_router(state: AppState) -> Router {
    with_layers(Router::new().nest("/api", api_routes()).with_state(state))
}

/// API router plus the built frontend, served from `static_dir` with an
/// `index.html` fallback for client-side routes
pub fn create_router_with_frontend(state: AppState, static_dir: &Path) -> Router {
    let index = static_dir.join("index.html");

    let router = Router::new()
        .nest("/api", api_routes())
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)));

    with_layers(router)
}

fn with_layers(router: Router) -> Router {
    router
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .merge(geo::create_geo_router())
        .fallback(api_not_found)
}

/// Unknown `/api` paths never reach the frontend fallback
async fn api_not_found() -> ApiError {
    ApiError::not_found("No API route matches this path")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::domain::geo::{BoundingBox, Element, ElementsResult, GeocodeMatch};
    use crate::domain::upstream::{MockElementsProvider, MockGeocodeProvider};
    use crate::domain::cache::MockCache;
    use crate::domain::Cache;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::services::{ElementsService, SearchService, SearchServiceConfig};
    use crate::infrastructure::throttle::CourtesyThrottle;

    fn paris_elements() -> ElementsResult {
        ElementsResult::new(vec![
            Element::new(1, 48.1, 2.1),
            Element::new(2, 48.2, 2.2),
        ])
    }

    fn rome() -> Vec<GeocodeMatch> {
        vec![GeocodeMatch {
            boundingbox: vec![
                "41.6".to_string(),
                "42.1".to_string(),
                "12.2".to_string(),
                "12.8".to_string(),
            ],
            lat: "41.89".to_string(),
            lon: "12.48".to_string(),
            display_name: "Roma".to_string(),
        }]
    }

    fn state_with(elements: MockElementsProvider, geocoder: MockGeocodeProvider) -> AppState {
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let elements_service = ElementsService::new(cache.clone(), Arc::new(elements));
        let search_service = SearchService::new(
            cache.clone(),
            Arc::new(geocoder),
            Arc::new(CourtesyThrottle::default()),
            SearchServiceConfig::new("fountain-gateway-test"),
        );

        AppState::new(Arc::new(elements_service), Arc::new(search_service), cache)
    }

    fn default_state() -> AppState {
        state_with(
            MockElementsProvider::new().with_response(paris_elements()),
            MockGeocodeProvider::new().with_response(rome()),
        )
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_health_returns_empty_ok() {
        let (status, _, body) = get(create_router(default_state()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_ready_reports_cache() {
        let (status, _, body) = get(create_router(default_state()), "/api/ready").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"][0]["name"], "cache:in_memory");
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_cache() {
        let cache: Arc<dyn Cache> = Arc::new(MockCache::new().with_error("connection refused"));
        let search = SearchService::new(
            cache.clone(),
            Arc::new(MockGeocodeProvider::new()),
            Arc::new(CourtesyThrottle::default()),
            SearchServiceConfig::new("test"),
        );
        let elements = ElementsService::new(cache.clone(), Arc::new(MockElementsProvider::new()));
        let state = AppState::new(Arc::new(elements), Arc::new(search), cache);

        let (status, _, body) = get(create_router(state), "/api/ready").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["checks"][0]["name"], "cache:mock");
        assert_eq!(json["checks"][0]["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_fountains_returns_elements_with_cache_policy() {
        let (status, headers, body) =
            get(create_router(default_state()), "/api/fountains/2.0/48.0/2.5/48.5").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            geo::FOUNTAINS_CACHE_CONTROL
        );
        assert_eq!(json["elements"].as_array().unwrap().len(), 2);
        assert_eq!(json["elements"][0]["id"], 1);
        assert!(json.get("cached").is_none());
    }

    #[tokio::test]
    async fn test_fountains_passes_requested_box() {
        let provider = Arc::new(MockElementsProvider::new().with_response(paris_elements()));
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());
        let search = SearchService::new(
            cache.clone(),
            Arc::new(MockGeocodeProvider::new()),
            Arc::new(CourtesyThrottle::default()),
            SearchServiceConfig::new("test"),
        );
        let state = AppState::new(
            Arc::new(ElementsService::new(cache.clone(), provider.clone())),
            Arc::new(search),
            cache,
        );

        let (status, _, _) = get(create_router(state), "/api/fountains/2.0/48.0/2.5/48.5").await;

        assert_eq!(status, StatusCode::OK);
        assert!(provider
            .calls()
            .contains(&BoundingBox::new(2.0, 48.0, 2.5, 48.5)));
    }

    #[tokio::test]
    async fn test_legacy_fountains_path() {
        let (status, headers, _) =
            get(create_router(default_state()), "/api/2.0/48.0/2.5/48.5").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::CACHE_CONTROL).is_some());
    }

    #[tokio::test]
    async fn test_fountains_rejects_non_numeric_segment() {
        let (status, headers, body) =
            get(create_router(default_state()), "/api/fountains/abc/48.0/2.5/48.5").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_fountains_upstream_failure() {
        let state = state_with(
            MockElementsProvider::new().with_error("HTTP 504"),
            MockGeocodeProvider::new(),
        );

        let (status, _, body) = get(create_router(state), "/api/fountains/2.0/48.0/2.5/48.5").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["title"], "Internal Server Error");
        assert_eq!(json["detail"], "Failed to get elements from Overpass API");
    }

    #[tokio::test]
    async fn test_search_returns_matches_with_cache_policy() {
        let (status, headers, body) =
            get(create_router(default_state()), "/api/search?query=Rome").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            geo::SEARCH_CACHE_CONTROL
        );
        assert_eq!(json[0]["display_name"], "Roma");
        assert_eq!(json[0]["boundingbox"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_search_missing_query() {
        let (status, _, _) = get(create_router(default_state()), "/api/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let geocoder = MockGeocodeProvider::new().with_response(rome());
        let state = state_with(MockElementsProvider::new(), geocoder);

        let (status, _, _) = get(create_router(state), "/api/search?query=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let state = state_with(
            MockElementsProvider::new(),
            MockGeocodeProvider::new().with_error("HTTP 503"),
        );

        let (status, _, _) = get(create_router(state), "/api/search?query=rome").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_frontend_fallback_serves_index() {
        let dir = std::env::temp_dir().join(format!("fountain-gateway-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>app</html>").unwrap();

        let router = create_router_with_frontend(default_state(), &dir);
        let (status, _, body) = get(router.clone(), "/map/somewhere").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>app</html>");

        let (status, _, _) = get(router, "/api/health").await;
        assert_eq!(status, StatusCode::OK);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_not_served_by_frontend() {
        let dir = std::env::temp_dir().join(format!("fountain-gateway-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>app</html>").unwrap();

        let router = create_router_with_frontend(default_state(), &dir);
        let (status, headers, body) = get(router, "/api/fountains/1/2/3").await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
        assert_eq!(json["status"], 404);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_unknown_api_path_without_frontend() {
        let (status, _, _) = get(create_router(default_state()), "/api/nothing/here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unmatched_paths_share_metric_series() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async {
                let router = create_router(default_state());

                for i in 0..250 {
                    let (status, _, _) = get(router.clone(), &format!("/scan-{}.php", i)).await;
                    assert_eq!(status, StatusCode::NOT_FOUND);

                    let (status, _, _) = get(router.clone(), &format!("/api/scan/{}", i)).await;
                    assert_eq!(status, StatusCode::NOT_FOUND);
                }
            });
        });

        let rendered = handle.render();
        let series: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .collect();

        assert!(!series.is_empty());
        assert!(series.len() <= 2, "unexpected series: {:?}", series);
        assert!(series.iter().all(|line| !line.contains("scan")));
    }

    #[tokio::test]
    async fn test_request_id_is_assigned() {
        let (_, headers, _) = get(create_router(default_state()), "/api/health").await;
        assert!(headers.get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_no_frontend_without_static_dir() {
        let (status, _, _) = get(create_router(default_state()), "/index.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
