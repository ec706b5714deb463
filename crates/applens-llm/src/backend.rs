//! Generation backend trait and the mock implementation.
//!
//! This module defines the seam between AppLens and whatever provider the
//! embedding application talks to, and provides a scripted backend for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{LlmError, Result};
use crate::types::{GenerationRequest, GenerationResponse};

// ─────────────────────────────────────────────────────────────────────────────
// Generation Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for generation-service providers.
///
/// One `generate` call is one round trip: no streaming, no retries. Timeouts
/// and cancellation belong to the implementation (or to the caller dropping
/// the future).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Execute a generation request and return the full response.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Check if the backend is available and properly configured.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// A backend that can be shared across threads.
pub type SharedBackend = Arc<dyn GenerationBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A mock backend for testing purposes.
///
/// Returns pre-configured outcomes in order and records every request it
/// receives.
#[derive(Debug)]
pub struct MockBackend {
    name: String,
    responses: Mutex<Vec<Result<GenerationResponse>>>,
    request_log: Mutex<Vec<GenerationRequest>>,
}

impl MockBackend {
    /// Create a new mock backend with the given responses.
    ///
    /// Responses are returned in order. If more requests are made than
    /// responses available, an error is returned.
    pub fn new(responses: Vec<GenerationResponse>) -> Self {
        Self::with_outcomes(responses.into_iter().map(Ok).collect())
    }

    /// Create a mock backend that replays successes and failures in order.
    pub fn with_outcomes(outcomes: Vec<Result<GenerationResponse>>) -> Self {
        Self {
            name: "mock".to_string(),
            responses: Mutex::new(outcomes),
            request_log: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock backend with a single text response.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![GenerationResponse::text(text)])
    }

    /// Create a mock backend whose only call fails with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self::with_outcomes(vec![Err(error)])
    }

    /// Get all requests that were made to this backend.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.request_log.lock().unwrap().clone()
    }

    /// Get the number of requests made.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        self.request_log.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::Backend(
                "MockBackend: no more responses available".to_string(),
            ));
        }
        responses.remove(0)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroundingChunk, GroundingMetadata};

    #[tokio::test]
    async fn test_mock_backend_single_response() {
        let backend = MockBackend::with_text("Hello!");

        let request = GenerationRequest::new("test-model", "Hi");
        let response = backend.generate(request).await.unwrap();

        assert_eq!(response.text_or_empty(), "Hello!");
        assert_eq!(backend.request_count(), 1);
        assert_eq!(backend.requests()[0].prompt, "Hi");
    }

    #[tokio::test]
    async fn test_mock_backend_multiple_responses() {
        let backend = MockBackend::new(vec![
            GenerationResponse::text("First"),
            GenerationResponse::text("Second").with_grounding(GroundingMetadata::new(vec![
                GroundingChunk::web("https://example.com"),
            ])),
        ]);

        let r1 = backend
            .generate(GenerationRequest::new("m", "1"))
            .await
            .unwrap();
        let r2 = backend
            .generate(GenerationRequest::new("m", "2"))
            .await
            .unwrap();

        assert_eq!(r1.text_or_empty(), "First");
        assert_eq!(r2.text_or_empty(), "Second");
        assert_eq!(r2.grounding_uris(), vec!["https://example.com"]);
        assert_eq!(backend.request_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_backend_exhausted() {
        let backend = MockBackend::new(vec![]);

        let result = backend.generate(GenerationRequest::new("m", "Hi")).await;

        assert!(result.is_err());
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_backend_failing() {
        let backend = MockBackend::failing(LlmError::Network("connection reset".to_string()));

        let err = backend
            .generate(GenerationRequest::new("m", "Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Network(_)));
    }

    #[tokio::test]
    async fn test_mock_backend_health_check() {
        let backend = MockBackend::with_text("test");
        assert!(backend.health_check().await.is_ok());
        assert_eq!(backend.name(), "mock");
    }
}
