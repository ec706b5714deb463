//! Chat service for follow-up questions about an analysed app.
//!
//! Each reply is one generation call: the analysis is embedded in the system
//! instruction, and as much recent history as the context window allows is
//! sent ahead of the new message.

use std::sync::Arc;

use applens_core::{AppAnalysis, ChatMessage, ContextWindow, CostModel, SearchResult};
use applens_llm::{GenerationRequest, SharedBackend, Turn};
use tracing::{debug, error};

use crate::error::{DomainError, Result};
use crate::prompt::chat_system_instruction;

/// Context window with a cost model chosen at runtime.
pub type SharedWindow = ContextWindow<Arc<dyn CostModel>>;

/// Answers questions grounded in a prior analysis.
#[derive(Clone)]
pub struct ChatService {
    backend: SharedBackend,
    model: String,
    temperature: Option<f32>,
    window: SharedWindow,
    fallback_reply: String,
}

impl ChatService {
    /// Create a new chat service.
    pub fn new(
        backend: SharedBackend,
        model: impl Into<String>,
        temperature: Option<f32>,
        window: SharedWindow,
        fallback_reply: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature,
            window,
            fallback_reply: fallback_reply.into(),
        }
    }

    /// The window used to trim history.
    pub fn window(&self) -> &SharedWindow {
        &self.window
    }

    /// Reply to `message` given the prior conversation.
    ///
    /// `history` is oldest first and must not include `message`. The caller
    /// appends both `message` and the returned reply to its own history. An
    /// empty or blank reply from the service becomes the fallback reply.
    pub async fn reply(
        &self,
        app: &SearchResult,
        analysis: &AppAnalysis,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String> {
        let system = chat_system_instruction(app, analysis);
        let reserved = format!("{system}{message}");
        let fitted = self.window.fit(history, &reserved);

        debug!(
            app = %app.name,
            kept = fitted.len(),
            dropped = history.len() - fitted.len(),
            "Fitted chat history"
        );

        let mut request = GenerationRequest::new(&self.model, message)
            .with_system(system)
            .with_history(fitted.iter().map(Turn::from).collect());
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }

        let response = self.backend.generate(request).await.map_err(|e| {
            error!(operation = "chat", app = %app.name, error = %e, "Generation failed");
            DomainError::from(e)
        })?;

        match response.text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => {
                debug!("Empty chat reply, using fallback");
                Ok(self.fallback_reply.clone())
            }
        }
    }
}
