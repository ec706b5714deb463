//! Field-level repair of model-reported app metadata.
//!
//! Every function here is pure and idempotent on its own output, so
//! [`clean_data`] can be applied to an already-clean analysis without
//! changing it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::AppAnalysis;

/// Sentinel for a value the model did not report in a usable form.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fallback for an empty review summary.
pub const DEFAULT_REVIEW_SUMMARY: &str = "No review summary is available for this app.";

/// Fallback for an empty authenticity assessment.
pub const DEFAULT_AUTHENTICITY: &str =
    "Authenticity could not be verified from the available sources.";

/// Fallback for an empty developer background.
pub const DEFAULT_BACKGROUND: &str = "No background information about the developer is available.";

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

static DECIMAL_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[0-4]\.\d|5\.0)\b").expect("valid rating regex")
});

static BARE_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-5](?:\.\d)?$").expect("valid bare rating regex"));

static BARE_INTEGER_RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-5]$").expect("valid integer rating regex"));

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

static DOWNLOAD_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:more\s+than|downloads|over|approx(?:imately)?\.?|installations|installs)\b",
    )
    .expect("valid download noise regex")
});

static MILLION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmillion\b").expect("valid million regex"));

static BILLION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbillion\b").expect("valid billion regex"));

static THOUSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bthousand\b").expect("valid thousand regex"));

/// Download-count shapes, in order of acceptance.
static DOWNLOAD_SHAPES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // 1,000,000+
        Regex::new(r"\d{1,3}(?:,\d{3})+\+?").expect("valid grouped regex"),
        // 10M+, 1.5 B, 500k
        Regex::new(r"(?i)\d+(?:\.\d+)?\s*[MBK]\b\+?").expect("valid magnitude regex"),
        // 500+
        Regex::new(r"\d+\+").expect("valid plus regex"),
        // 50000
        Regex::new(r"\d{3,}\+?").expect("valid integer regex"),
    ]
});

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

/// One capture group per accepted shape. An ISO date may run straight into a
/// `T` time part.
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b(?:({MONTH}\s+\d{{1,2}},\s*\d{{4}})\b|(\d{{4}}-\d{{2}}-\d{{2}})(?:\b|T)|(\d{{1,2}}\s+{MONTH}\s+\d{{4}})\b)"
    );
    Regex::new(&pattern).expect("valid date regex")
});

// ─────────────────────────────────────────────────────────────────────────────
// Field Normalizers
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize a star rating to `"N/A"` or a one-decimal value in `0.0..=5.0`.
///
/// Precedence: a one-decimal value anywhere in `raw`, then a valid
/// `fallback`, then a bare integer `1..=5` in `raw`, then `"N/A"`.
pub fn normalize_rating(raw: &str, fallback: Option<&str>) -> String {
    if let Some(m) = DECIMAL_RATING.find(raw) {
        return m.as_str().to_string();
    }

    if let Some(rating) = fallback.and_then(valid_fallback_rating) {
        return rating;
    }

    let trimmed = raw.trim();
    if BARE_INTEGER_RATING.is_match(trimmed) {
        return format!("{trimmed}.0");
    }

    NOT_AVAILABLE.to_string()
}

/// A fallback is usable only as a bare integer or one-decimal value in `0..=5`.
fn valid_fallback_rating(fallback: &str) -> Option<String> {
    let trimmed = fallback.trim();
    if trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) || !BARE_RATING.is_match(trimmed) {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    (value <= 5.0).then(|| format!("{value:.1}"))
}

/// Pull a rating out of a search candidate without fallback context.
///
/// Takes the first number in `raw` and accepts it if it lies in `0..=5`,
/// rendering it with one decimal.
pub fn quick_rating(raw: &str) -> String {
    FIRST_NUMBER
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| (0.0..=5.0).contains(value))
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Normalize a download count to `"N/A"` or a compact magnitude token.
pub fn normalize_downloads(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return NOT_AVAILABLE.to_string();
    }

    let cleaned = DOWNLOAD_NOISE.replace_all(trimmed, " ");
    let cleaned = MILLION.replace_all(&cleaned, "M");
    let cleaned = BILLION.replace_all(&cleaned, "B");
    let cleaned = THOUSAND.replace_all(&cleaned, "k");

    DOWNLOAD_SHAPES
        .iter()
        .find_map(|shape| shape.find(&cleaned))
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Find a calendar date in `raw` and return it verbatim.
///
/// Accepted shapes: `Month DD, YYYY`, `YYYY-MM-DD` and `DD Month YYYY`, with
/// case-insensitive month names or abbreviations. The leftmost match wins.
pub fn normalize_date(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    DATE.captures(raw)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str().to_string())
}

/// Replace empty free-text fields with fixed fallback sentences.
pub fn fill_defaults(mut analysis: AppAnalysis) -> AppAnalysis {
    fill(&mut analysis.review_summary, DEFAULT_REVIEW_SUMMARY);
    fill(&mut analysis.authenticity, DEFAULT_AUTHENTICITY);
    fill(&mut analysis.background, DEFAULT_BACKGROUND);
    analysis
}

fn fill(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}

/// Normalize every field of a freshly extracted analysis.
///
/// `fallback_rating` is typically the rating the app carried in search
/// results. Grounding URLs are deduplicated, keeping first-seen order.
pub fn clean_data(analysis: AppAnalysis, fallback_rating: Option<&str>) -> AppAnalysis {
    let mut analysis = fill_defaults(analysis);

    analysis.rating = normalize_rating(&analysis.rating, fallback_rating);
    analysis.downloads = normalize_downloads(&analysis.downloads);
    analysis.last_updated = analysis.last_updated.as_deref().and_then(normalize_date);

    let mut seen = HashSet::new();
    analysis.grounding_urls.retain(|url| seen.insert(url.clone()));

    analysis
}
