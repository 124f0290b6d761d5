//! Keyword heuristic used when the LLM path is unavailable.
//!
//! Matching is plain substring containment on the lower-cased text, so
//! inflected forms ("problemas", "urgentemente") still hit. Each keyword
//! counts at most once.

use super::{Category, ClassificationResult};

/// Terms that signal the sender needs something done (PT + EN).
pub const PRODUCTIVE_KEYWORDS: &[&str] = &[
    "solicito",
    "preciso",
    "problema",
    "erro",
    "bug",
    "ajuda",
    "suporte",
    "dúvida",
    "questão",
    "atualização",
    "status",
    "pedido",
    "requisição",
    "alteração",
    "correção",
    "urgente",
    "request",
    "issue",
    "problem",
    "help",
    "support",
    "update",
    "question",
    "change",
    "fix",
    "urgent",
];

/// Greetings, thanks and holiday wishes (PT + EN).
pub const UNPRODUCTIVE_KEYWORDS: &[&str] = &[
    "feliz natal",
    "feliz ano novo",
    "parabéns",
    "congratulações",
    "obrigado",
    "thanks",
    "thank you",
    "agradeço",
    "agradecimento",
    "felicitações",
    "aniversário",
    "birthday",
    "congratulations",
    "boas festas",
    "happy new year",
    "merry christmas",
];

// Confidence is 0.6 + 0.1 per hit, capped at 0.9. Kept in tenths so the
// result is exactly representable on the wire (0.8, not 0.80000001).
const BASE_TENTHS: usize = 6;
const MAX_TENTHS: usize = 9;

/// Keyword hit counts for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeywordScore {
    pub productive: usize,
    pub unproductive: usize,
}

impl KeywordScore {
    /// Count how many keywords of each list occur in `text`.
    pub fn of(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            productive: count_hits(&lower, PRODUCTIVE_KEYWORDS),
            unproductive: count_hits(&lower, UNPRODUCTIVE_KEYWORDS),
        }
    }

    /// Turn the counts into a result. Ties go to Productive.
    pub fn to_result(self) -> ClassificationResult {
        if self.unproductive > self.productive {
            ClassificationResult {
                category: Category::Unproductive,
                confidence: scaled_confidence(self.unproductive),
            }
        } else {
            ClassificationResult {
                category: Category::Productive,
                confidence: scaled_confidence(self.productive),
            }
        }
    }
}

fn count_hits(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

fn scaled_confidence(hits: usize) -> f32 {
    let tenths = BASE_TENTHS.saturating_add(hits).min(MAX_TENTHS);
    tenths as f32 / 10.0
}

/// Classify text by keyword counts alone. Confidence is always in `[0.6, 0.9]`.
pub fn classify_by_keywords(text: &str) -> ClassificationResult {
    KeywordScore::of(text).to_result()
}
