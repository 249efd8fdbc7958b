//! Axum route handler for document uploads.

use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_document, DocumentFormat};

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub filename: String,
    pub file_size: usize,
    pub format: DocumentFormat,
    pub text: String,
}

/// POST /extract_text
///
/// Accepts a multipart upload with a `file` field (PDF, DOC, DOCX or TXT) and
/// returns its plain text.
pub async fn handle_extract_text(mut multipart: Multipart) -> Result<Json<ExtractTextResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let format = DocumentFormat::detect(Some(&filename), content_type.as_deref())?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
        let file_size = data.len();

        info!("Extracting text from '{filename}' ({file_size} bytes, {format:?})");
        let text = extract_document(data, format, content_type).await?;

        return Ok(Json(ExtractTextResponse {
            filename,
            file_size,
            format,
            text,
        }));
    }

    Err(AppError::Validation(format!(
        "No '{FILE_FIELD}' field found in the upload"
    )))
}
