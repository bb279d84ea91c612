//! Bounding boxes and the 1°×1° cells used as the unit of spatial caching

use serde::{Deserialize, Serialize};

use crate::domain::cache::{namespaced, CacheKey};

/// Namespace of spatial cache entries
pub const OVERPASS_NAMESPACE: &str = "overpass";

/// A longitude/latitude box in degrees.
///
/// No ordering is enforced between the edges: a malformed box is passed
/// through to the upstream as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The cell anchored at this box's south-west corner
    pub fn cell(&self) -> GeoCell {
        GeoCell::containing(self)
    }
}

/// A 1°×1° latitude/longitude square.
///
/// Coordinates are truncated toward zero, so the cell of a box is a pure
/// function of `trunc(south)` and `trunc(west)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCell {
    lat: f64,
    lng: f64,
}

impl GeoCell {
    pub fn containing(bbox: &BoundingBox) -> Self {
        Self {
            lat: truncate_degree(bbox.south),
            lng: truncate_degree(bbox.west),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// The full square anchored at the truncated corner
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.lng, self.lat, self.lng + 1.0, self.lat + 1.0)
    }
}

// Adding 0.0 folds -0.0 into 0.0 so cells straddling the equator or the
// prime meridian keep a single key.
fn truncate_degree(value: f64) -> f64 {
    value.trunc() + 0.0
}

impl CacheKey for GeoCell {
    fn cache_key(&self) -> String {
        namespaced(
            OVERPASS_NAMESPACE,
            &format!("{:.6}-{:.6}", self.lat, self.lng),
        )
    }
}
