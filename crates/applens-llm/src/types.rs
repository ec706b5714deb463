//! Core types for generation requests and responses.
//!
//! These mirror the shape of a grounded text-generation API (prompt, system
//! instruction, prior turns, optional web-search tool in; text plus citation
//! metadata out) while staying provider-agnostic.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Conversation Turns
// ─────────────────────────────────────────────────────────────────────────────

/// The role of a conversation turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prior turn sent along with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced the turn.
    pub role: Role,
    /// Text payload.
    pub text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────────────────────────────────────

/// Server-side capabilities a request may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Let the model consult web search and report citations.
    WebSearch,
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Request
// ─────────────────────────────────────────────────────────────────────────────

/// A single call to the generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use.
    pub model: String,

    /// The instruction, or the newest user message for conversations.
    pub prompt: String,

    /// System instruction (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Prior conversation turns, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Turn>,

    /// Capabilities to enable for this call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,

    /// Temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    /// Create a new request with the given model and prompt.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            history: Vec::new(),
            tools: Vec::new(),
            temperature: None,
        }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the prior turns.
    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }

    /// Enable the web-search capability.
    pub fn with_web_search(mut self) -> Self {
        if !self.tools.contains(&Tool::WebSearch) {
            self.tools.push(Tool::WebSearch);
        }
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Returns true if web search is enabled.
    pub fn uses_web_search(&self) -> bool {
        self.tools.contains(&Tool::WebSearch)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generation Response
// ─────────────────────────────────────────────────────────────────────────────

/// A web source cited by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    /// The cited URI.
    pub uri: String,
    /// Page title, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One grounding citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    /// Web source for this chunk, if it came from web search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

impl GroundingChunk {
    /// Create a chunk citing a web URI.
    pub fn web(uri: impl Into<String>) -> Self {
        Self {
            web: Some(WebSource {
                uri: uri.into(),
                title: None,
            }),
        }
    }
}

/// Citation metadata attached to a grounded response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingMetadata {
    #[serde(default)]
    pub chunks: Vec<GroundingChunk>,
}

impl GroundingMetadata {
    /// Create metadata from a list of chunks.
    pub fn new(chunks: Vec<GroundingChunk>) -> Self {
        Self { chunks }
    }

    /// Web URIs across all chunks, deduplicated, first-seen order kept.
    ///
    /// Empty URIs are dropped.
    pub fn web_uris(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .map(|web| web.uri.trim())
            .filter(|uri| !uri.is_empty())
            .filter(|uri| seen.insert(*uri))
            .map(str::to_string)
            .collect()
    }
}

/// The result of a generation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Response text; absent when the service produced none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Grounding metadata, present when web search was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding: Option<GroundingMetadata>,
}

impl GenerationResponse {
    /// Create a text-only response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            grounding: None,
        }
    }

    /// Create a response with no text.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach grounding metadata.
    pub fn with_grounding(mut self, grounding: GroundingMetadata) -> Self {
        self.grounding = Some(grounding);
        self
    }

    /// The response text, or `""` when absent.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Deduplicated web citation URIs, empty when there is no grounding.
    pub fn grounding_uris(&self) -> Vec<String> {
        self.grounding
            .as_ref()
            .map(GroundingMetadata::web_uris)
            .unwrap_or_default()
    }
}
