//! Cache key derivation

/// Types that map to a stable cache key.
///
/// Keys are namespaced strings such as `overpass:48.000000-2.000000` or
/// `osm:paris`; two values with the same key share one cache entry.
pub trait CacheKey {
    fn cache_key(&self) -> String;
}

impl CacheKey for str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

/// Joins a namespace and an identifier the way all entries are keyed
pub fn namespaced(namespace: &str, id: &str) -> String {
    format!("{}:{}", namespace, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{BoundingBox, SearchQuery};

    #[test]
    fn test_namespaced() {
        assert_eq!(namespaced("osm", "rome"), "osm:rome");
    }

    #[test]
    fn test_plain_strings_are_their_own_key() {
        assert_eq!("osm:rome".cache_key(), "osm:rome");
        assert_eq!(String::from("x").cache_key(), "x");
    }

    #[test]
    fn test_geo_keys_use_their_namespace() {
        let cell = BoundingBox::new(12.4, 41.8, 12.6, 41.9).cell();
        let query = SearchQuery::parse("Rome").unwrap();

        assert!(cell.cache_key().starts_with("overpass:"));
        assert_eq!(query.cache_key(), namespaced("osm", "rome"));
    }
}
