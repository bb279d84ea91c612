//! Points of interest returned by the spatial query service

use serde::{Deserialize, Serialize};

/// A single point of interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    pub fn new(id: i64, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }
}

/// Elements within a bounding box.
///
/// `cached` is only set on the copy written by the background cell warmer;
/// live responses never carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementsResult {
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cached: bool,
}

impl ElementsResult {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            cached: false,
        }
    }

    /// Marks this payload as sourced from the cell cache
    pub fn into_cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
