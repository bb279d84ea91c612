//! Nominatim geocoding client

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::geo::{GeocodeResult, SearchQuery, MAX_MATCHES};
use crate::domain::upstream::GeocodeProvider;
use crate::domain::DomainError;

pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const PROVIDER: &str = "nominatim";

/// Nominatim API client
#[derive(Debug)]
pub struct NominatimClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> NominatimClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_NOMINATIM_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn search_url(&self, query: &SearchQuery) -> Result<String, DomainError> {
        let endpoint = format!("{}/search", self.base_url);
        let limit = MAX_MATCHES.to_string();
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("q", query.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
            ],
        )
        .map_err(|e| {
            DomainError::configuration(format!("Invalid Nominatim URL '{}': {}", endpoint, e))
        })?;

        Ok(url.into())
    }
}

#[async_trait]
impl<C: HttpClientTrait> GeocodeProvider for NominatimClient<C> {
    async fn geocode(
        &self,
        query: &SearchQuery,
        client_id: &str,
    ) -> Result<GeocodeResult, DomainError> {
        if client_id.is_empty() {
            return Err(DomainError::configuration(
                "Nominatim requires a client identifier (User-Agent)",
            ));
        }

        let url = self.search_url(query)?;
        debug!(query = %query, "Querying Nominatim");

        let response = self
            .client
            .get_json(&url, vec![("User-Agent", client_id), ("Accept", "application/json")])
            .await
            .map_err(|e| DomainError::upstream(PROVIDER, e.to_string()))?;

        let mut matches: GeocodeResult = serde_json::from_value(response).map_err(|e| {
            DomainError::upstream(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        matches.truncate(MAX_MATCHES);
        Ok(matches)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::upstream::http_client::mock::MockHttpClient;
    use crate::infrastructure::upstream::http_client::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rome_match(name: &str) -> serde_json::Value {
        json!({
            "place_id": 1,
            "boundingbox": ["41.6", "42.1", "12.2", "12.8"],
            "lat": "41.8933203",
            "lon": "12.4829321",
            "display_name": name,
            "class": "boundary"
        })
    }

    #[test]
    fn test_search_url() {
        let client = NominatimClient::with_base_url(MockHttpClient::new(), "http://geo.test/");
        let query = SearchQuery::parse("New York").unwrap();

        assert_eq!(
            client.search_url(&query).unwrap(),
            "http://geo.test/search?q=new+york&format=json&limit=3"
        );
    }

    #[tokio::test]
    async fn test_geocode_sends_client_id() {
        let client = NominatimClient::new(MockHttpClient::new());
        let query = SearchQuery::parse("rome").unwrap();
        let url = client.search_url(&query).unwrap();

        let mock = MockHttpClient::new().with_response(url, json!([rome_match("Roma")]));
        let client = NominatimClient::new(mock);

        let result = client.geocode(&query, "fountain-finder/1.0").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].display_name, "Roma");

        let requests = client.client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .headers
            .contains(&("User-Agent".to_string(), "fountain-finder/1.0".to_string())));
    }

    #[tokio::test]
    async fn test_geocode_caps_matches() {
        let client = NominatimClient::new(MockHttpClient::new());
        let query = SearchQuery::parse("san").unwrap();
        let url = client.search_url(&query).unwrap();

        let body = json!([rome_match("a"), rome_match("b"), rome_match("c"), rome_match("d")]);
        let client = NominatimClient::new(MockHttpClient::new().with_response(url, body));

        let result = client.geocode(&query, "ua").await.unwrap();
        assert_eq!(result.len(), MAX_MATCHES);
    }

    #[tokio::test]
    async fn test_geocode_requires_client_id() {
        let client = NominatimClient::new(MockHttpClient::new());
        let query = SearchQuery::parse("rome").unwrap();

        let err = client.geocode(&query, "").await.unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(client.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_geocode_against_http_server() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rome"))
            .and(query_param("format", "json"))
            .and(header("User-Agent", "fountain-finder-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([rome_match("Roma")])))
            .expect(1)
            .mount(&server)
            .await;

        let client = NominatimClient::with_base_url(HttpClient::new(), server.uri());
        let query = SearchQuery::parse("Rome").unwrap();

        let result = client
            .geocode(&query, "fountain-finder-test")
            .await
            .unwrap();

        assert_eq!(result[0].lat, "41.8933203");
        assert_eq!(result[0].boundingbox.len(), 4);
    }

    #[tokio::test]
    async fn test_geocode_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = NominatimClient::with_base_url(HttpClient::new(), server.uri());
        let query = SearchQuery::parse("rome").unwrap();

        let err = client.geocode(&query, "ua").await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { ref provider, .. } if provider == "nominatim"));
    }
}
