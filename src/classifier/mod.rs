//! Email classification into Productive / Unproductive.
//!
//! Two paths:
//! 1. LLM path: prompt the configured provider, parse its terse reply
//! 2. Keyword path: deterministic substring scoring, used when no provider is
//!    configured or the remote call fails
//!
//! `EmailClassifier::classify` never fails; every remote error lands on the
//! keyword path.

pub mod keywords;
pub mod parse;
pub mod prompts;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::LlmProvider;

pub use keywords::classify_by_keywords;
pub use parse::parse_classification_reply;

/// Temperature for the classification call (terse, deterministic-leaning).
const CLASSIFY_TEMPERATURE: f32 = 0.3;

/// Max tokens for the classification call. The reply is one word and a number.
const CLASSIFY_MAX_TOKENS: u32 = 50;

/// Whether an email needs action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Requires an actionable reply.
    #[serde(rename = "Produtivo")]
    Productive,
    /// No action needed.
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Category {
    /// Wire label, as returned to API callers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Productive => "Produtivo",
            Self::Unproductive => "Improdutivo",
        }
    }

    /// Map a free-form label onto a category.
    ///
    /// Only "produtivo" in any casing is productive. Anything else,
    /// including padded labels and typos, is unproductive.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase() == "produtivo" {
            Self::Productive
        } else {
            Self::Unproductive
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category plus a confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub confidence: f32,
}

/// Classifies email text, preferring the LLM when one is configured.
pub struct EmailClassifier {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl EmailClassifier {
    /// Create a classifier. `None` selects the keyword heuristic permanently.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    /// Whether classification will attempt the remote path.
    pub fn uses_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Classify an email. Total: remote failures degrade to keyword scoring.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let Some(llm) = &self.llm else {
            let result = classify_by_keywords(text);
            debug!(
                category = %result.category,
                confidence = result.confidence,
                "Classified by keyword heuristic (no LLM configured)"
            );
            return result;
        };

        let user_prompt = prompts::classification_user_prompt(text);
        match llm
            .invoke(
                prompts::CLASSIFY_SYSTEM_PROMPT,
                &user_prompt,
                CLASSIFY_TEMPERATURE,
                CLASSIFY_MAX_TOKENS,
            )
            .await
        {
            Ok(reply) => {
                let result = parse_classification_reply(&reply);
                debug!(
                    model = llm.model_name(),
                    raw_reply = %reply,
                    category = %result.category,
                    confidence = result.confidence,
                    "Classified by LLM"
                );
                result
            }
            Err(e) => {
                warn!(
                    model = llm.model_name(),
                    error = %e,
                    "LLM classification failed, falling back to keyword heuristic"
                );
                classify_by_keywords(text)
            }
        }
    }
}
