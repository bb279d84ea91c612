//! Application state for shared services

use std::sync::Arc;

use crate::domain::Cache;
use crate::infrastructure::services::{ElementsService, SearchService};

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub elements_service: Arc<ElementsService>,
    pub search_service: Arc<SearchService>,
    pub cache: Arc<dyn Cache>,
}

impl AppState {
    pub fn new(
        elements_service: Arc<ElementsService>,
        search_service: Arc<SearchService>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            elements_service,
            search_service,
            cache,
        }
    }
}
