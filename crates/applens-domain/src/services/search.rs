//! App search service.
//!
//! Asks the generation service, with web search enabled, for apps matching a
//! free-text query and recovers a bounded list of [`SearchResult`]s from the
//! reply.

use applens_config::MAX_SEARCH_RESULTS;
use applens_core::{RawSearchResult, SearchResult, extract_json, quick_rating};
use applens_llm::{GenerationRequest, SharedBackend};
use tracing::{debug, error, warn};

use crate::error::{DomainError, Result};
use crate::prompt::search_prompt;

/// Finds candidate apps for a query.
#[derive(Clone)]
pub struct SearchService {
    backend: SharedBackend,
    model: String,
    temperature: Option<f32>,
    max_results: usize,
}

impl SearchService {
    /// Create a new search service.
    ///
    /// `max_results` is clamped to `1..=MAX_SEARCH_RESULTS`.
    pub fn new(
        backend: SharedBackend,
        model: impl Into<String>,
        temperature: Option<f32>,
        max_results: usize,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
            max_results: max_results.clamp(1, MAX_SEARCH_RESULTS),
        }
    }

    /// Maximum number of results returned by [`search`](Self::search).
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Search for apps matching `query`.
    ///
    /// Returns at most `max_results` entries, in the order the service listed
    /// them, with ratings repaired by [`quick_rating`]. A reply with no
    /// recoverable JSON array yields an empty list. Service failures are
    /// logged and returned unchanged.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::InvalidInput("search query is empty".to_string()));
        }

        debug!(query_len = query.len(), max_results = self.max_results, "Searching apps");

        let mut request =
            GenerationRequest::new(&self.model, search_prompt(query, self.max_results))
                .with_web_search();
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.backend.generate(request).await.map_err(|e| {
            error!(operation = "search", error = %e, "Generation failed");
            DomainError::from(e)
        })?;

        let Some(raw) = extract_json::<Vec<RawSearchResult>>(response.text_or_empty()) else {
            warn!(
                operation = "search",
                query_len = query.len(),
                "Search reply held no result list"
            );
            return Ok(Vec::new());
        };

        let results: Vec<SearchResult> = raw
            .into_iter()
            .take(self.max_results)
            .map(|r| SearchResult {
                rating: quick_rating(&r.rating),
                name: r.name,
                developer: r.developer,
                description: r.description,
            })
            .collect();

        debug!(results = results.len(), "Search complete");
        Ok(results)
    }
}
