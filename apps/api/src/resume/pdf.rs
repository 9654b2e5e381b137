use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file is not a PDF document")]
    NotPdf,

    #[error("{0}")]
    Parse(String),

    #[error("text extraction aborted: {0}")]
    Aborted(String),
}

/// Turns an uploaded document into plain text.
///
/// An empty or whitespace-only result is not an error here; callers decide
/// what an empty document means for them.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, DocumentError>;
}

/// `pdf-extract` backed extractor. Parsing is CPU-bound, so it runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, DocumentError> {
        if !looks_like_pdf(&bytes) {
            return Err(DocumentError::NotPdf);
        }

        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            // pdf-extract panics on some malformed inputs; the join error carries that
            .map_err(|e| DocumentError::Aborted(e.to_string()))?
            .map_err(|e| DocumentError::Parse(format!("{e:?}")))?;

        debug!(size, chars = text.chars().count(), "extracted text from PDF");
        Ok(text)
    }
}

/// PDF files start with `%PDF-`, possibly after a little leading junk.
/// Readers tolerate up to 1024 bytes of it, so we do too.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"));
        assert!(looks_like_pdf(b"\r\n%PDF-1.4"));
        assert!(!looks_like_pdf(b"PK\x03\x04 docx archive"));
        assert!(!looks_like_pdf(b""));
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_bytes() {
        let err = PdfTextExtractor
            .extract_text(Bytes::from_static(b"plain text resume"))
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotPdf));
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_an_error_not_a_crash() {
        let err = PdfTextExtractor
            .extract_text(Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<<"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Parse(_) | DocumentError::Aborted(_)
        ));
    }
}
