use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::geo::{BoundingBox, ElementsResult, GeocodeResult, SearchQuery};
use crate::domain::DomainError;

/// Spatial query service returning the points inside a bounding box
#[async_trait]
pub trait ElementsProvider: Send + Sync + Debug {
    async fn fetch_elements(&self, bbox: &BoundingBox) -> Result<ElementsResult, DomainError>;

    fn provider_name(&self) -> &'static str;
}

/// Geocoding service resolving a free-text query to candidate places
#[async_trait]
pub trait GeocodeProvider: Send + Sync + Debug {
    /// `client_id` identifies this deployment to the upstream, which refuses
    /// anonymous clients.
    async fn geocode(
        &self,
        query: &SearchQuery,
        client_id: &str,
    ) -> Result<GeocodeResult, DomainError>;

    fn provider_name(&self) -> &'static str;
}
