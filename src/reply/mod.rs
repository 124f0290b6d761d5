//! Suggested-reply generation.
//!
//! Uses the LLM when one is configured; otherwise, or when the call fails,
//! returns a fixed reply chosen by category. Never fails.

pub mod templates;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classifier::Category;
use crate::llm::LlmProvider;

pub use templates::fallback_reply;

/// Sampling settings for reply generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// LLM temperature for reply generation.
    pub temperature: f32,
    /// Max tokens for LLM response.
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 300,
        }
    }
}

/// Drafts a suggested reply for a classified email.
pub struct ResponseGenerator {
    llm: Option<Arc<dyn LlmProvider>>,
    config: GeneratorConfig,
}

impl ResponseGenerator {
    /// Create a generator. `None` always returns canned replies.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>, config: GeneratorConfig) -> Self {
        Self { llm, config }
    }

    /// Whether generation will attempt the remote path.
    pub fn uses_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Draft a reply for `email_text` in the given category.
    pub async fn generate_response(&self, email_text: &str, category: Category) -> String {
        let Some(llm) = &self.llm else {
            debug!(category = %category, "Using canned reply (no LLM configured)");
            return fallback_reply(category).to_string();
        };

        let user_prompt = templates::reply_user_prompt(email_text, category);
        match llm
            .invoke(
                templates::REPLY_SYSTEM_PROMPT,
                &user_prompt,
                self.config.temperature,
                self.config.max_tokens,
            )
            .await
        {
            Ok(reply) => {
                info!(
                    model = llm.model_name(),
                    category = %category,
                    chars = reply.chars().count(),
                    "Generated reply"
                );
                reply
            }
            Err(e) => {
                warn!(
                    model = llm.model_name(),
                    category = %category,
                    error = %e,
                    "Reply generation failed, using canned reply"
                );
                fallback_reply(category).to_string()
            }
        }
    }

    /// Same as [`generate_response`](Self::generate_response) for a category
    /// given as a free-form label (see [`Category::from_label`]).
    pub async fn generate_response_for_label(&self, email_text: &str, label: &str) -> String {
        self.generate_response(email_text, Category::from_label(label))
            .await
    }
}
