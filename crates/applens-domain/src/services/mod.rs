//! Domain services.
//!
//! This module contains the services that orchestrate AppLens's three
//! operations: search, analysis and follow-up chat.

pub mod analysis;
pub mod chat;
pub mod search;

use std::sync::Arc;

use applens_config::{AppLensConfig, CostModelKind};
use applens_core::{CharCount, ContextWindow, CostModel, EstimatedTokens};
use applens_llm::SharedBackend;
use tracing::info;

pub use chat::SharedWindow;

/// Domain services facade.
///
/// Provides unified access to all domain services. This is the main entry
/// point for a presentation layer; it holds no per-user state.
#[derive(Clone)]
pub struct DomainServices {
    search: search::SearchService,
    analysis: analysis::AnalysisService,
    chat: chat::ChatService,
}

impl DomainServices {
    /// Create domain services over `backend`, configured from `config`.
    pub fn new(backend: SharedBackend, config: &AppLensConfig) -> Self {
        let llm = config.llm();
        let search_config = config.search();
        let chat_config = config.chat();

        info!(
            backend = backend.name(),
            model = %llm.model,
            max_results = search_config.max_results,
            context_budget = chat_config.context_budget,
            "Initializing domain services"
        );

        let cost: Arc<dyn CostModel> = match chat_config.cost_model {
            CostModelKind::Chars => Arc::new(CharCount),
            CostModelKind::Tokens => Arc::new(EstimatedTokens::new(chat_config.chars_per_token)),
        };
        let window = ContextWindow::with_cost_model(chat_config.context_budget, cost);

        let search = search::SearchService::new(
            backend.clone(),
            llm.model.clone(),
            llm.temperature,
            search_config.max_results,
        );
        let analysis =
            analysis::AnalysisService::new(backend.clone(), llm.model.clone(), llm.temperature);
        let chat = chat::ChatService::new(
            backend,
            llm.model,
            llm.temperature,
            window,
            chat_config.fallback_reply,
        );

        Self {
            search,
            analysis,
            chat,
        }
    }

    /// Get the search service.
    pub fn search(&self) -> &search::SearchService {
        &self.search
    }

    /// Get the analysis service.
    pub fn analysis(&self) -> &analysis::AnalysisService {
        &self.analysis
    }

    /// Get the chat service.
    pub fn chat(&self) -> &chat::ChatService {
        &self.chat
    }
}

#[cfg(test)]
mod tests {
    use applens_config::{ChatConfig, SearchConfig};
    use applens_llm::MockBackend;

    use super::*;

    #[test]
    fn test_defaults_from_empty_config() {
        let services =
            DomainServices::new(Arc::new(MockBackend::new(vec![])), &AppLensConfig::new());

        assert_eq!(services.search().max_results(), 4);
        assert_eq!(services.chat().window().budget(), 60_000);
        assert_eq!(services.chat().window().cost_of("abcdefgh"), 8);
    }

    #[test]
    fn test_token_cost_model_selected() {
        let mut config = AppLensConfig::new();
        config.search = Some(SearchConfig { max_results: 2 });
        config.chat = Some(ChatConfig {
            cost_model: CostModelKind::Tokens,
            chars_per_token: 4,
            ..ChatConfig::default()
        });

        let services = DomainServices::new(Arc::new(MockBackend::new(vec![])), &config);
        assert_eq!(services.search().max_results(), 2);
        assert_eq!(services.chat().window().cost_of("abcdefghi"), 3);
    }

    #[test]
    fn test_unvalidated_result_cap_is_clamped() {
        let mut config = AppLensConfig::new();
        config.search = Some(SearchConfig { max_results: 0 });
        let services = DomainServices::new(Arc::new(MockBackend::new(vec![])), &config);
        assert_eq!(services.search().max_results(), 1);

        config.search = Some(SearchConfig { max_results: 50 });
        let services = DomainServices::new(Arc::new(MockBackend::new(vec![])), &config);
        assert_eq!(services.search().max_results(), 4);
    }
}
