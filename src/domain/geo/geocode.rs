//! Free-text search queries and geocoding matches

use serde::{Deserialize, Serialize};

use crate::domain::cache::{namespaced, CacheKey};
use crate::domain::DomainError;

/// Namespace of geocode cache entries
pub const SEARCH_NAMESPACE: &str = "osm";

/// Maximum number of characters of a query kept for keying and upstream
pub const MAX_QUERY_CHARS: usize = 15;

/// Maximum number of matches requested from the geocoder
pub const MAX_MATCHES: usize = 3;

/// A candidate match from the geocoding service.
///
/// Numeric fields stay string-typed, the way the upstream returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub boundingbox: Vec<String>,
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

/// Up to [`MAX_MATCHES`] candidates for a search
pub type GeocodeResult = Vec<GeocodeMatch>;

/// A normalized search query.
///
/// Queries are lower-cased and cut to their first [`MAX_QUERY_CHARS`]
/// characters, so longer queries sharing a prefix share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DomainError::validation("Search query must not be empty"));
        }

        let normalized: String = trimmed
            .to_lowercase()
            .chars()
            .take(MAX_QUERY_CHARS)
            .collect();

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl CacheKey for SearchQuery {
    fn cache_key(&self) -> String {
        namespaced(SEARCH_NAMESPACE, &self.0)
    }
}
