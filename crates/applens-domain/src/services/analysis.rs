//! App analysis service.

use applens_core::{AppAnalysis, RawAnalysis, SearchResult, clean_data, extract_json_object};
use applens_llm::{GenerationRequest, SharedBackend};
use tracing::{debug, error};

use crate::error::{DomainError, Result};
use crate::prompt::analysis_prompt;

/// Produces a cleaned trust analysis for one app.
#[derive(Clone)]
pub struct AnalysisService {
    backend: SharedBackend,
    model: String,
    temperature: Option<f32>,
}

impl AnalysisService {
    /// Create a new analysis service.
    pub fn new(backend: SharedBackend, model: impl Into<String>, temperature: Option<f32>) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
        }
    }

    /// Analyse `app` with web search enabled.
    ///
    /// The reply's JSON object is cleaned with `app.rating` as the rating
    /// fallback, and the call's web citations become `grounding_urls`
    /// (deduplicated, first-seen order). A reply with no recoverable object
    /// fails with [`DomainError::AnalysisParse`].
    pub async fn analyze(&self, app: &SearchResult) -> Result<AppAnalysis> {
        debug!(app = %app.name, developer = %app.developer, "Analysing app");

        let mut request =
            GenerationRequest::new(&self.model, analysis_prompt(app)).with_web_search();
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.backend.generate(request).await.map_err(|e| {
            error!(operation = "analyze", app = %app.name, error = %e, "Generation failed");
            DomainError::from(e)
        })?;

        let Some(raw) = extract_json_object::<RawAnalysis>(response.text_or_empty()) else {
            error!(app = %app.name, "Analysis reply held no JSON object");
            return Err(DomainError::AnalysisParse);
        };

        let grounding_urls = response.grounding_uris();
        debug!(sources = grounding_urls.len(), "Analysis grounded");

        Ok(clean_data(raw.into_analysis(grounding_urls), Some(&app.rating)))
    }
}
