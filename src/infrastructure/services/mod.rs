//! Application services

mod elements_service;
mod search_service;
mod seed_service;

pub use elements_service::{ElementsService, ElementsServiceConfig, DEFAULT_CELL_TTL};
pub use search_service::{SearchService, SearchServiceConfig, DEFAULT_SEARCH_TTL};
pub use seed_service::{prefixes, SeedOutcome, SeedReport, SeedService, MAX_PREFIX_LEN, SEED_TTL};
