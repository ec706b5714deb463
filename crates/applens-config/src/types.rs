//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [llm]
//! model = "gemini-2.5-flash"
//! temperature = 0.2
//!
//! [search]
//! max_results = 4
//!
//! [chat]
//! context_budget = 60000
//! cost_model = "chars"      # or "tokens"
//! chars_per_token = 4
//! fallback_reply = "..."
//! ```

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Maximum number of search results returned by default.
pub const DEFAULT_MAX_RESULTS: usize = 4;

/// Upper bound on `search.max_results`.
pub const MAX_SEARCH_RESULTS: usize = 4;

/// Default context budget for chat history, in cost units.
pub const DEFAULT_CONTEXT_BUDGET: usize = 60_000;

/// Default characters-per-token ratio for the token cost model.
pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

/// Reply used when the generation service returns no text.
pub const DEFAULT_FALLBACK_REPLY: &str = "I'm sorry, I couldn't generate a response.";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Every section is optional so partial files (e.g. a project-local override)
/// parse and merge cleanly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppLensConfig {
    /// Generation model settings.
    pub llm: Option<LlmConfig>,

    /// Search settings.
    pub search: Option<SearchConfig>,

    /// Chat settings.
    pub chat: Option<ChatConfig>,
}

impl AppLensConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: AppLensConfig) {
        if other.llm.is_some() {
            self.llm = other.llm;
        }

        if other.search.is_some() {
            self.search = other.search;
        }

        if other.chat.is_some() {
            self.chat = other.chat;
        }
    }

    /// Effective LLM settings.
    pub fn llm(&self) -> LlmConfig {
        self.llm.clone().unwrap_or_default()
    }

    /// Effective search settings.
    pub fn search(&self) -> SearchConfig {
        self.search.clone().unwrap_or_default()
    }

    /// Effective chat settings.
    pub fn chat(&self) -> ChatConfig {
        self.chat.clone().unwrap_or_default()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let llm = self.llm();
        if llm.model.trim().is_empty() {
            return Err(ConfigError::invalid("llm.model", "must not be empty"));
        }
        if let Some(temperature) = llm.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ConfigError::invalid(
                "llm.temperature",
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }

        let max_results = self.search().max_results;
        if !(1..=MAX_SEARCH_RESULTS).contains(&max_results) {
            return Err(ConfigError::invalid(
                "search.max_results",
                format!("{max_results} is outside 1..={MAX_SEARCH_RESULTS}"),
            ));
        }

        let chat = self.chat();
        if chat.context_budget == 0 {
            return Err(ConfigError::invalid("chat.context_budget", "must be at least 1"));
        }
        if chat.chars_per_token == 0 {
            return Err(ConfigError::invalid("chat.chars_per_token", "must be at least 1"));
        }

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// `[llm]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier passed to the backend.
    pub model: String,
    /// Sampling temperature; backend default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound on returned search results.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// How chat history is measured against the context budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModelKind {
    /// Character count.
    #[default]
    Chars,
    /// Estimated tokens (characters / `chars_per_token`).
    Tokens,
}

/// `[chat]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Budget for system instruction, pending message and history.
    pub context_budget: usize,
    /// Unit of the budget.
    pub cost_model: CostModelKind,
    /// Ratio used by the token cost model.
    pub chars_per_token: usize,
    /// Reply returned when the service produces no text.
    pub fallback_reply: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            context_budget: DEFAULT_CONTEXT_BUDGET,
            cost_model: CostModelKind::default(),
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}
