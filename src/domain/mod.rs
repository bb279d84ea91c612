//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod geo;
pub mod upstream;

pub use cache::{Cache, CacheExt, CacheKey};
pub use error::DomainError;
pub use geo::{
    BoundingBox, Element, ElementsResult, GeoCell, GeocodeMatch, GeocodeResult, SearchQuery,
};
pub use upstream::{ElementsProvider, GeocodeProvider};
