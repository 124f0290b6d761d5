//! Bridges rig's `CompletionModel` to our `LlmProvider` trait.

use std::time::Duration;

use async_trait::async_trait;
use rig::completion::CompletionModel;
use rig::message::{AssistantContent, Message};

use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};

/// Default wall-clock budget for one completion call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `LlmProvider` backed by any rig completion model.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    timeout: Duration,
}

impl<M> RigAdapter<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, model_name: &str) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Split our message list into rig's (preamble, prompt) shape.
///
/// System messages are joined into the preamble and user messages into the
/// prompt, each separated by a blank line.
fn split_messages(messages: Vec<ChatMessage>) -> Result<(Option<String>, String), LlmError> {
    let (system, user): (Vec<ChatMessage>, Vec<ChatMessage>) = messages
        .into_iter()
        .partition(|m| m.role == Role::System);

    if user.is_empty() {
        return Err(LlmError::InvalidRequest("no user message to send".into()));
    }

    let join = |messages: Vec<ChatMessage>| {
        messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let preamble = (!system.is_empty()).then(|| join(system));
    Ok((preamble, join(user)))
}

/// rig reports usage as `u64`; saturate rather than wrap.
fn token_count(tokens: u64) -> u32 {
    u32::try_from(tokens).unwrap_or(u32::MAX)
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (preamble, prompt) = split_messages(request.messages)?;

        let mut builder = self.model.completion_request(Message::user(prompt));
        if let Some(preamble) = preamble {
            builder = builder.preamble(preamble);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| LlmError::Timeout {
                provider: self.model_name.clone(),
                timeout: self.timeout,
            })?
            .map_err(|e| LlmError::RequestFailed {
                provider: self.model_name.clone(),
                reason: e.to_string(),
            })?;

        let mut content: Option<String> = None;
        for part in response.choice.iter() {
            if let AssistantContent::Text(text) = part {
                content.get_or_insert_with(String::new).push_str(&text.text);
            }
        }

        let content = content.ok_or_else(|| LlmError::InvalidResponse {
            provider: self.model_name.clone(),
            reason: "response contained no text content".into(),
        })?;

        Ok(CompletionResponse {
            content,
            input_tokens: token_count(response.usage.input_tokens),
            output_tokens: token_count(response.usage.output_tokens),
        })
    }
}
