//! Structured-output recovery for AppLens.
//!
//! Generation services return semi-structured text. This crate turns that
//! text into validated, bounded data:
//!
//! - [`extract`]: pull the first JSON object/array out of prose and fences
//! - [`normalize`]: repair ratings, download counts, dates and empty text
//! - [`window`]: select the conversation suffix that fits a budget
//! - [`types`]: the data model shared with the service layer
//!
//! Everything here is synchronous and free of shared mutable state.

pub mod extract;
pub mod normalize;
pub mod types;
pub mod window;

pub use extract::{
    extract_json, extract_json_object, extract_json_value, find_json_span, find_object_span,
};
pub use normalize::{
    NOT_AVAILABLE, clean_data, fill_defaults, normalize_date, normalize_downloads,
    normalize_rating, quick_rating,
};
pub use types::{AppAnalysis, ChatMessage, RawAnalysis, RawSearchResult, SearchResult};
pub use window::{
    CharCount, ContextWindow, CostModel, DEFAULT_CHARS_PER_TOKEN, DEFAULT_CONTEXT_BUDGET,
    EstimatedTokens,
};
