//! Parsing of the LLM's free-form classification reply.
//!
//! The model is asked for `"<Produtivo|Improdutivo> <confidence>"`, but nothing
//! enforces that. Missing pieces fall back to defaults instead of failing.

use std::sync::LazyLock;

use regex::Regex;

use super::{Category, ClassificationResult};

/// Confidence used when the reply carries no usable number.
pub const DEFAULT_CONFIDENCE: f32 = 0.8;

/// First integer or decimal token in the reply. ASCII digits only, since
/// `str::parse` rejects other scripts.
static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.?[0-9]*)").expect("number token regex is valid"));

/// Parse an LLM classification reply into a result.
///
/// "improdutivo" is checked before "produtivo" since the former contains the
/// latter. A reply with neither keyword is Productive.
pub fn parse_classification_reply(reply: &str) -> ClassificationResult {
    let reply = reply.trim();
    let lower = reply.to_lowercase();

    let category = if lower.contains("improdutivo") {
        Category::Unproductive
    } else {
        // Covers both an explicit "produtivo" and no keyword at all.
        Category::Productive
    };

    ClassificationResult {
        category,
        confidence: parse_confidence(reply).unwrap_or(DEFAULT_CONFIDENCE),
    }
}

/// Extract and normalize the confidence token.
///
/// Values above 1 are read as percentages. The result is clamped to `[0, 1]`.
fn parse_confidence(reply: &str) -> Option<f32> {
    let token = NUMBER_TOKEN.find(reply)?;
    let mut value: f32 = token.as_str().parse().ok()?;
    if value > 1.0 {
        value /= 100.0;
    }
    Some(value.clamp(0.0, 1.0))
}
