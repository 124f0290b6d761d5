//! REST handlers for classification.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::AppState;
use super::error::ApiError;
use crate::classifier::{Category, ClassificationResult};
use crate::text::{extract_keywords, extract_text_from_file, is_allowed_file};

/// Number of keywords surfaced in the full classification response.
const RESPONSE_KEYWORDS: usize = 10;

/// Multipart part carrying the uploaded email.
const FILE_FIELD: &str = "file";

/// JSON body accepted by both classify endpoints.
///
/// The outer `Option` is whether the key was sent at all, the inner one
/// whether it was `null`.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Option<String>>,
}

/// Mark a field as present, even when its value is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Classification plus suggested reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub category: Category,
    pub confidence: f32,
    pub suggested_response: String,
    /// Characters in the text that was classified (`/api/classify` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_text_length: Option<usize>,
    /// Most frequent words (`/api/classify` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

// ── Health ──────────────────────────────────────────────────────────────

pub(super) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "Email Classification API is running",
        "llm_enabled": state.classifier.uses_llm(),
    }))
}

pub(super) async fn not_found() -> ApiError {
    ApiError::NotFound
}

// ── Classification ──────────────────────────────────────────────────────

/// POST /api/classify
///
/// Accepts either `{"text": "..."}` as JSON or a multipart upload with a
/// `.txt`/`.pdf` part named `file`.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub(super) async fn classify_email(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let email_text = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state).await.map_err(|e| {
            ApiError::InvalidUpload {
                status: e.status(),
                reason: e.body_text(),
            }
        })?;
        text_from_upload(multipart).await?
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<TextRequest>::from_request(request, &state)
            .await
            .map_err(|e| {
                debug!(error = %e, "Rejected JSON body");
                ApiError::MissingInput
            })?;
        body.text
            .flatten()
            .filter(|text| !text.is_empty())
            .ok_or(ApiError::MissingInput)?
    } else {
        return Err(ApiError::MissingInput);
    };

    if email_text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }

    let (classification, suggested_response) = classify_and_reply(&state, &email_text).await;

    Ok(Json(ClassifyResponse {
        category: classification.category,
        confidence: classification.confidence,
        suggested_response,
        processed_text_length: Some(email_text.chars().count()),
        keywords: Some(extract_keywords(&email_text, RESPONSE_KEYWORDS)),
    }))
}

/// POST /api/classify/text
///
/// JSON-only variant: `{"text": "..."}`.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub(super) async fn classify_text(
    State(state): State<AppState>,
    body: Result<Json<TextRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    // A `null` text counts as sent but empty.
    let email_text = body
        .ok()
        .and_then(|Json(body)| body.text)
        .ok_or(ApiError::MissingTextField)?
        .unwrap_or_default();

    if email_text.trim().is_empty() {
        return Err(ApiError::EmptyText);
    }

    let (classification, suggested_response) = classify_and_reply(&state, &email_text).await;

    Ok(Json(ClassifyResponse {
        category: classification.category,
        confidence: classification.confidence,
        suggested_response,
        processed_text_length: None,
        keywords: None,
    }))
}

/// Classify, then draft a reply for the resulting category.
async fn classify_and_reply(state: &AppState, email_text: &str) -> (ClassificationResult, String) {
    let classification = state.classifier.classify(email_text).await;
    let reply = state
        .generator
        .generate_response(email_text, classification.category)
        .await;

    info!(
        category = %classification.category,
        confidence = classification.confidence,
        text_chars = email_text.chars().count(),
        "Email classified"
    );

    (classification, reply)
}

/// Pull the `file` part out of a multipart body and extract its text.
async fn text_from_upload(mut multipart: Multipart) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload {
            status: e.status(),
            reason: e.body_text(),
        })?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(ApiError::NoFileSelected);
        }
        if !is_allowed_file(&file_name) {
            return Err(ApiError::FileTypeNotAllowed);
        }

        let data = field.bytes().await.map_err(|e| ApiError::InvalidUpload {
            status: e.status(),
            reason: e.body_text(),
        })?;

        // PDF parsing is CPU-bound.
        return tokio::task::spawn_blocking(move || extract_text_from_file(&file_name, &data))
            .await
            .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?
            .map_err(ApiError::Extraction);
    }

    Err(ApiError::MissingInput)
}
