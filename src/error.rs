//! Error types for email-triage.

use std::time::Duration;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
///
/// Callers never branch on the variant: any of these means "the remote call
/// failed" and selects the local fallback.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} timed out after {timeout:?}")]
    Timeout { provider: String, timeout: Duration },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors while turning an uploaded file into plain text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid UTF-8 content: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("No text could be extracted from the PDF. The file may be corrupted or an image.")]
    EmptyPdf,
}
