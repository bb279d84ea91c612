//! Offline warm-up of the search cache over short alphabetic prefixes

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::search_service::SearchService;
use crate::domain::geo::SearchQuery;

/// Lifetime of seeded search entries
pub const SEED_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Longest prefix the seeder will generate
pub const MAX_PREFIX_LEN: usize = 3;

/// Every lowercase prefix of length 1 to `max_len`, depth first
/// (`a`, `aa`, `aaa`, `aab`, ... `zzz`).
pub fn prefixes(max_len: usize) -> Vec<String> {
    let max_len = max_len.min(MAX_PREFIX_LEN);
    let mut out = Vec::new();
    let mut current = String::new();
    extend_prefixes(&mut current, max_len, &mut out);
    out
}

fn extend_prefixes(current: &mut String, max_len: usize, out: &mut Vec<String>) {
    if current.len() == max_len {
        return;
    }

    for ch in 'a'..='z' {
        current.push(ch);
        out.push(current.clone());
        extend_prefixes(current, max_len, out);
        current.pop();
    }
}

/// Result of seeding one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Already cached; no upstream call made
    Skipped,
    /// Fetched and stored with this many matches
    Fetched(usize),
    /// Upstream call failed; nothing stored
    Failed(String),
}

/// Totals for a seeding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SeedReport {
    pub fn record(&mut self, outcome: &SeedOutcome) {
        match outcome {
            SeedOutcome::Skipped => self.skipped += 1,
            SeedOutcome::Fetched(_) => self.fetched += 1,
            SeedOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.fetched + self.skipped + self.failed
    }
}

/// Walks the prefix space one query at a time through [`SearchService`],
/// which spaces out upstream calls. Build that service with [`SEED_TTL`] so
/// seeded entries outlive interactive ones.
#[derive(Debug)]
pub struct SeedService {
    search: Arc<SearchService>,
}

impl SeedService {
    pub fn new(search: Arc<SearchService>) -> Self {
        Self { search }
    }

    pub async fn seed_query(&self, prefix: &str) -> SeedOutcome {
        let query = match SearchQuery::parse(prefix) {
            Ok(query) => query,
            Err(e) => return SeedOutcome::Failed(e.to_string()),
        };

        if self.search.cached(&query).await.is_some() {
            return SeedOutcome::Skipped;
        }

        match self.search.refresh(&query).await {
            Ok(matches) => SeedOutcome::Fetched(matches.len()),
            Err(e) => SeedOutcome::Failed(e.to_string()),
        }
    }

    /// Seeds every prefix up to `max_len`. Failures are logged and the run
    /// carries on.
    pub async fn run(&self, max_len: usize) -> SeedReport {
        let mut report = SeedReport::default();

        for prefix in prefixes(max_len) {
            let outcome = self.seed_query(&prefix).await;

            match &outcome {
                SeedOutcome::Skipped => info!(prefix = %prefix, "Skipping, already cached"),
                SeedOutcome::Fetched(count) => {
                    info!(prefix = %prefix, matches = count, "Seeded")
                }
                SeedOutcome::Failed(error) => warn!(prefix = %prefix, error = %error, "Seed failed"),
            }

            report.record(&outcome);
        }

        report
    }
}
