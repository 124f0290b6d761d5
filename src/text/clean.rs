//! Text normalization and keyword extraction.
//!
//! Pure string processing, no LLM calls.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("url regex is valid"));

static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email regex is valid"));

static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.?!,]").expect("special chars regex is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Common Portuguese and English function words.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "o", "e", "de", "do", "da", "em", "um", "uma", "para", "com", "não", "que", "é",
        "como", "mas", "se", "ou", "mais", "the", "be", "to", "of", "and", "in", "that", "have",
        "i", "it", "for", "not", "on", "with", "he", "as", "you", "at", "this", "but", "his",
        "by", "from",
    ]
    .into_iter()
    .collect()
});

/// Minimum length (in chars, exclusive) for a word to count as a keyword.
const MIN_KEYWORD_CHARS: usize = 3;

/// Normalize email text for classification.
///
/// Lower-cases, drops URLs and email addresses, replaces symbols other than
/// basic punctuation with spaces, and collapses whitespace.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lower = text.to_lowercase();
    let no_urls = URL.replace_all(&lower, "");
    let no_emails = EMAIL_ADDRESS.replace_all(&no_urls, "");
    let no_symbols = SPECIAL_CHARS.replace_all(&no_emails, " ");
    let collapsed = WHITESPACE_RUN.replace_all(&no_symbols, " ");
    collapsed.trim().to_string()
}

/// Drop stop words from whitespace-separated text.
pub fn remove_stop_words(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Most frequent words longer than three characters, most frequent first.
///
/// Ties keep first-seen order.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    let cleaned = remove_stop_words(&clean_text(text));

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= MIN_KEYWORD_CHARS {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}
