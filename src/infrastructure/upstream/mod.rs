//! Upstream geodata clients - Overpass and Nominatim over HTTP

mod http_client;
mod nominatim;
mod overpass;

pub use http_client::{HttpClient, HttpClientTrait};
pub use nominatim::{NominatimClient, DEFAULT_NOMINATIM_BASE_URL};
pub use overpass::{drinking_water_query, OverpassClient, DEFAULT_OVERPASS_BASE_URL};
