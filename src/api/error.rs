//! Request-level failures and their HTTP rendering.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::ExtractError;

/// Everything a handler can reject a request with.
///
/// Messages are user-facing and match what the web frontend displays.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Envie um texto ou arquivo para classificação")]
    MissingInput,

    #[error("Campo \"text\" é obrigatório")]
    MissingTextField,

    #[error("Texto do email está vazio")]
    EmptyText,

    #[error("Nenhum arquivo selecionado")]
    NoFileSelected,

    #[error("Tipo de arquivo não permitido. Use .txt ou .pdf")]
    FileTypeNotAllowed,

    #[error("Upload inválido: {reason}")]
    InvalidUpload { status: StatusCode, reason: String },

    #[error("Erro ao processar email")]
    Extraction(#[source] ExtractError),

    #[error("Erro ao processar email")]
    Internal(String),

    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput
            | Self::MissingTextField
            | Self::EmptyText
            | Self::NoFileSelected
            | Self::FileTypeNotAllowed => StatusCode::BAD_REQUEST,
            Self::InvalidUpload { status, .. } => *status,
            Self::Extraction(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Extra detail for the `message` field, if any.
    fn detail(&self) -> Option<String> {
        match self {
            Self::Extraction(e) => Some(e.to_string()),
            Self::Internal(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({ "error": self.to_string() });
        if let Some(detail) = self.detail() {
            body["message"] = serde_json::Value::String(detail);
        }

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, detail = ?self.detail(), "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        for err in [
            ApiError::MissingInput,
            ApiError::MissingTextField,
            ApiError::EmptyText,
            ApiError::NoFileSelected,
            ApiError::FileTypeNotAllowed,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
            assert!(err.detail().is_none());
        }
    }

    #[test]
    fn extraction_errors_map_to_500_with_detail() {
        let err = ApiError::Extraction(ExtractError::EmptyPdf);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Erro ao processar email");
        assert!(err.detail().unwrap().contains("PDF"));
    }

    #[test]
    fn invalid_upload_keeps_its_status() {
        let err = ApiError::InvalidUpload {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            reason: "length limit exceeded".into(),
        };
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn response_carries_status() {
        let response = ApiError::EmptyText.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
