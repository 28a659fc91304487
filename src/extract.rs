//! PDF text extraction.
//!
//! Turns the raw bytes of a PDF into one UTF-8 string per page. Extraction
//! never panics on malformed input: every failure becomes an
//! [`ExtractError`] so the loader can decide whether to skip or abort.

use thiserror::Error;

/// Extraction error.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("not a PDF (missing %PDF header)")]
    NotPdf,
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("PDF extraction panicked")]
    Panicked,
    #[error("PDF has no pages")]
    NoPages,
}

/// Extract the text of every page, in page order.
pub fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    if !looks_like_pdf(bytes) {
        return Err(ExtractError::NotPdf);
    }
    // pdf-extract can panic on some malformed inputs; contain it here.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) if pages.is_empty() => Err(ExtractError::NoPages),
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Panicked),
    }
}

/// The `%PDF-` marker must appear within the first KiB.
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_pdf() {
        let err = extract_pdf_pages(b"plain text, not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::NotPdf));
    }

    #[test]
    fn test_truncated_pdf_is_error() {
        let err = extract_pdf_pages(b"%PDF-1.4\n1 0 obj <<").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Pdf(_) | ExtractError::Panicked | ExtractError::NoPages
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_pdf_pages(b"").is_err());
    }
}
