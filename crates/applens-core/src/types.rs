//! Domain data model and the raw records extracted from model output.

use applens_llm::{Role, Turn};
use serde::{Deserialize, Deserializer, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

/// An app candidate returned by a search.
///
/// `rating` is always a normalized rating string (`"N/A"` or one decimal
/// digit in `0.0..=5.0`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub name: String,
    pub developer: String,
    pub description: String,
    pub rating: String,
}

/// A search candidate as the model wrote it, before any repair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub developer: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Analysis
// ─────────────────────────────────────────────────────────────────────────────

/// A trust/quality analysis of one app.
///
/// Values handed to callers have passed through
/// [`clean_data`](crate::normalize::clean_data): the free-text fields are
/// non-empty, `rating` and `downloads` are canonical, and `grounding_urls`
/// holds no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppAnalysis {
    pub review_summary: String,
    pub authenticity: String,
    pub background: String,
    pub rating: String,
    pub downloads: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub grounding_urls: Vec<String>,
}

/// An analysis object as the model wrote it, before any repair.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub review_summary: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub authenticity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub background: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub downloads: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_updated: String,
}

impl RawAnalysis {
    /// Convert into an (unnormalized) analysis carrying the given citations.
    pub fn into_analysis(self, grounding_urls: Vec<String>) -> AppAnalysis {
        AppAnalysis {
            review_summary: self.review_summary,
            authenticity: self.authenticity,
            background: self.background,
            rating: self.rating,
            downloads: self.downloads,
            last_updated: Some(self.last_updated).filter(|s| !s.trim().is_empty()),
            grounding_urls,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// One message of a caller-owned conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a model message.
    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for Turn {
    fn from(message: &ChatMessage) -> Self {
        Turn {
            role: message.role,
            text: message.content.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Accept any JSON scalar where a string is expected.
///
/// Models emit `"rating": 4.5` as readily as `"rating": "4.5"`. Numbers and
/// booleans are rendered to text; null becomes the empty string. Arrays and
/// objects are rendered as compact JSON rather than rejected.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}
