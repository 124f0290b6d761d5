//! Uploaded file → plain text.
//!
//! Supports: TXT (UTF-8, normalized with `clean_text`), PDF.

use std::path::Path;

use tracing::{info, warn};

use super::clean::clean_text;
use crate::error::ExtractError;

/// Extensions accepted for upload, lower-case.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Lower-cased extension of a file name, if it has one.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Whether a file name carries an allowed extension.
pub fn is_allowed_file(file_name: &str) -> bool {
    extension_of(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Extract text content from file bytes based on the file extension.
pub fn extract_text_from_file(file_name: &str, file_data: &[u8]) -> Result<String, ExtractError> {
    let extension = extension_of(file_name).unwrap_or_default();

    info!(file = file_name, extension = %extension, bytes = file_data.len(), "Extracting text from upload");

    match extension.as_str() {
        "txt" => {
            let raw = String::from_utf8(file_data.to_vec())?;
            Ok(clean_text(&raw))
        }
        "pdf" => extract_pdf_text(file_data),
        _ => Err(ExtractError::UnsupportedExtension(extension)),
    }
}

fn extract_pdf_text(file_data: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(file_data).map_err(|e| {
        warn!(error = %e, "PDF extraction failed");
        ExtractError::Pdf(e.to_string())
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::EmptyPdf);
    }

    info!(chars = text.chars().count(), "PDF extraction successful");
    Ok(text.to_string())
}
