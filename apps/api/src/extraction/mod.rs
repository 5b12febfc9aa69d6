//! Text Extractor — turns an uploaded resume (PDF or plain text) into the
//! plain-text content the match engine consumes.

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";

/// Extracts plain text from uploaded bytes based on the declared content type.
///
/// PDFs go through `pdf-extract` with page text concatenated by newlines;
/// pages yielding no text are skipped. Anything else is decoded strictly as
/// UTF-8 — the decoded text is returned byte-for-byte, no normalization.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String, AppError> {
    if is_pdf(content_type) {
        extract_pdf_text(bytes)
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|e| AppError::Decode(e.to_string()))
    }
}

/// Matches the media type ignoring parameters like `; charset=utf-8`.
fn is_pdf(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|t| t.eq_ignore_ascii_case(PDF_MIME))
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::DocumentParse(e.to_string()))?;

    // A structurally valid PDF with no extractable text (e.g. scanned images)
    // is an empty result, not an error.
    if text.trim().is_empty() {
        return Ok(String::new());
    }

    Ok(text)
}
