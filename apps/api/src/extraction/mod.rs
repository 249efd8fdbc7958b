//! Document text extraction: bytes plus a declared format in, plain text out.
//!
//! Dispatch is by MIME type when the client sent a recognised one, otherwise by
//! file extension. Parsing runs on the blocking pool.

pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod plain;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}. Please upload a PDF, DOC, DOCX or TXT file.")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to extract text from Word document: {0}")]
    Docx(String),

    #[error("Legacy binary .doc files are not supported. Please save the document as .docx or PDF.")]
    LegacyDoc,

    #[error("Failed to decode text file: {0}")]
    Encoding(String),

    #[error("No text could be extracted from the uploaded file")]
    NoText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "application/pdf" => Some(Self::Pdf),
            "application/msword" => Some(Self::Doc),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "text/plain" => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Recognised MIME type first, then extension.
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        content_type
            .and_then(Self::from_mime)
            .or_else(|| file_name.and_then(Self::from_file_name))
            .ok_or_else(|| {
                ExtractionError::UnsupportedFormat(
                    file_name
                        .or(content_type)
                        .unwrap_or("unknown")
                        .to_string(),
                )
            })
    }
}

/// Synchronous extraction. Returns trimmed text; empty output is an error.
/// `content_type` only matters for TXT, where its `charset` is honoured.
pub fn extract_text(
    bytes: &[u8],
    format: DocumentFormat,
    content_type: Option<&str>,
) -> Result<String, ExtractionError> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes)?,
        DocumentFormat::Doc => {
            if docx::is_zip_container(bytes) {
                docx::extract(bytes)?
            } else {
                return Err(ExtractionError::LegacyDoc);
            }
        }
        DocumentFormat::Txt => plain::decode(bytes, content_type)?,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::NoText);
    }
    Ok(text.to_string())
}

/// Runs `extract_text` on the blocking pool. A panic inside a parser library
/// is reported as an extraction error for that format.
pub async fn extract_document(
    bytes: bytes::Bytes,
    format: DocumentFormat,
    content_type: Option<String>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, format, content_type.as_deref()))
        .await
        .unwrap_or_else(|join_err| {
            let detail = format!("parser aborted: {join_err}");
            Err(match format {
                DocumentFormat::Pdf => ExtractionError::Pdf(detail),
                DocumentFormat::Doc | DocumentFormat::Docx => ExtractionError::Docx(detail),
                DocumentFormat::Txt => ExtractionError::Encoding(detail),
            })
        })
}
