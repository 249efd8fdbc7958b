// Thin wrapper over `pdf-extract`. Keep this module small.

use crate::extraction::ExtractionError;

/// Extracts text from a PDF held fully in memory.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !is_pdf(bytes) {
        return Err(ExtractionError::Pdf("missing %PDF- header".to_string()));
    }
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Magic-byte check. Some writers emit a few bytes of junk before the header,
/// so the first kilobyte is searched.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}
