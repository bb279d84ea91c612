//! Overpass spatial query client

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::geo::{BoundingBox, Element, ElementsResult};
use crate::domain::upstream::ElementsProvider;
use crate::domain::DomainError;

pub const DEFAULT_OVERPASS_BASE_URL: &str = "https://overpass.kumi.systems";

const PROVIDER: &str = "overpass";

/// Overpass QL query for drinking water nodes inside a box.
///
/// Overpass expects `(south,west,north,east)`.
pub fn drinking_water_query(bbox: &BoundingBox) -> String {
    format!(
        r#"[out:json][timeout:25];(node["amenity"="drinking_water"]({:.6},{:.6},{:.6},{:.6}););out body;>;out skel qt;"#,
        bbox.south, bbox.west, bbox.north, bbox.east
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl OverpassElement {
    fn into_domain(self) -> Option<Element> {
        Some(Element::new(self.id, self.lat?, self.lon?))
    }
}

/// Overpass API client
#[derive(Debug)]
pub struct OverpassClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OverpassClient<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OVERPASS_BASE_URL)
    }

    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Full interpreter URL carrying the encoded query for `bbox`
    pub fn interpreter_url(&self, bbox: &BoundingBox) -> Result<String, DomainError> {
        let endpoint = format!("{}/api/interpreter/", self.base_url);
        let url = Url::parse_with_params(&endpoint, &[("data", drinking_water_query(bbox))])
            .map_err(|e| {
                DomainError::configuration(format!("Invalid Overpass URL '{}': {}", endpoint, e))
            })?;

        Ok(url.into())
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<ElementsResult, DomainError> {
        let response: OverpassResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::upstream(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        let elements = response
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_domain)
            .collect();

        Ok(ElementsResult::new(elements))
    }
}

#[async_trait]
impl<C: HttpClientTrait> ElementsProvider for OverpassClient<C> {
    async fn fetch_elements(&self, bbox: &BoundingBox) -> Result<ElementsResult, DomainError> {
        let url = self.interpreter_url(bbox)?;
        debug!(?bbox, "Querying Overpass");

        let response = self
            .client
            .get_json(&url, vec![("Accept", "application/json")])
            .await
            .map_err(|e| DomainError::upstream(PROVIDER, e.to_string()))?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
