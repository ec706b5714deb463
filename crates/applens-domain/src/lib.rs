//! Domain facade for AppLens.
//!
//! This crate wires the generation boundary ([`applens_llm`]), structured
//! output recovery ([`applens_core`]) and configuration
//! ([`applens_config`]) into the three user-facing operations:
//!
//! - **Search**: find candidate apps for a free-text query
//! - **Analysis**: produce a cleaned trust analysis with source links
//! - **Chat**: answer follow-up questions grounded in an analysis
//!
//! # Example
//!
//! ```ignore
//! use applens_domain::DomainServices;
//!
//! let services = DomainServices::new(backend, &config);
//! let apps = services.search().search("habit tracker").await?;
//! let analysis = services.analysis().analyze(&apps[0]).await?;
//! let reply = services.chat().reply(&apps[0], &analysis, &history, "Is it safe?").await?;
//! ```
//!
//! Services are stateless between calls; conversation history is owned by
//! the caller and passed in on every chat turn.

mod error;
pub mod prompt;
pub mod services;

pub use error::{ANALYSIS_PARSE_MESSAGE, DomainError, Result};
pub use services::DomainServices;
pub use services::SharedWindow;
pub use services::analysis::AnalysisService;
pub use services::chat::ChatService;
pub use services::search::SearchService;

// Re-export commonly used types from underlying crates
pub use applens_config::AppLensConfig;
pub use applens_core::{AppAnalysis, ChatMessage, SearchResult};
pub use applens_llm::{GenerationBackend, LlmError, SharedBackend};
