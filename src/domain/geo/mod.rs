//! Geodata domain - bounding boxes, cache cells, elements and geocode matches

mod bbox;
mod element;
mod geocode;

pub use bbox::{BoundingBox, GeoCell, OVERPASS_NAMESPACE};
pub use element::{Element, ElementsResult};
pub use geocode::{
    GeocodeMatch, GeocodeResult, SearchQuery, MAX_MATCHES, MAX_QUERY_CHARS, SEARCH_NAMESPACE,
};
