//! Search orchestration
//!
//! Wraps a [`GeocodeProvider`] so callers always get a bounded list of
//! well-formed candidates. Provider failures are logged and surface only as
//! an empty list.

use crate::constants::search::MAX_RESULTS;
use crate::geo::{GeocodeProvider, SearchResult};
use tracing::{debug, warn};

/// Turns free-text queries into at most `max_results` candidates
#[derive(Debug, Clone)]
pub struct SearchOrchestrator<P> {
    provider: P,
    max_results: usize,
}

impl<P: GeocodeProvider> SearchOrchestrator<P> {
    /// Create an orchestrator returning up to 3 candidates
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            max_results: MAX_RESULTS,
        }
    }

    /// Override the result cap (clamped to 1..=3)
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS);
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Search for a place
    ///
    /// Never fails: an empty list means either "no match" or "provider
    /// unavailable", and callers cannot tell the two apart.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.provider.geocode(query).await {
            Ok(candidates) => {
                let total = candidates.len();
                let results: Vec<SearchResult> = candidates
                    .into_iter()
                    .filter(SearchResult::is_well_formed)
                    .take(self.max_results)
                    .collect();
                debug!(
                    "Search '{}' via {}: {} of {} candidates kept",
                    query,
                    self.provider.name(),
                    results.len(),
                    total
                );
                results
            }
            Err(e) => {
                warn!("Search '{}' via {} failed: {}", query, self.provider.name(), e);
                Vec::new()
            }
        }
    }
}
