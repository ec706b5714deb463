//! Domain error types.

use thiserror::Error;

/// Message carried by [`DomainError::AnalysisParse`].
pub const ANALYSIS_PARSE_MESSAGE: &str = "could not parse analysis";

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The generation service call failed; passed through unchanged.
    #[error(transparent)]
    Llm(#[from] applens_llm::LlmError),

    /// The analysis reply held no usable JSON object.
    #[error("could not parse analysis")]
    AnalysisParse,

    /// Caller input rejected before any service call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
