//! Document extraction: turns an uploaded resume into plain text.

use std::io::Write;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Upstream of keyword extraction: raw upload bytes in, document text out.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError>;
}

/// PDF text extraction via `pdf-extract`.
///
/// The upload is spooled to a temporary file that is removed when extraction
/// finishes. Parsing runs on the blocking pool since it is CPU-bound and may
/// panic on malformed input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError> {
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(AppError::Document(
                "uploaded file is not a PDF document".to_string(),
            ));
        }

        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || extract_from_spooled_file(&bytes))
            .await
            .map_err(|e| AppError::Document(format!("PDF parser aborted: {e}")))??;

        debug!("Extracted {} chars of text from {} byte PDF", text.len(), size);
        Ok(text)
    }
}

fn extract_from_spooled_file(bytes: &[u8]) -> Result<String, AppError> {
    let mut file = NamedTempFile::new().map_err(|e| AppError::Internal(e.into()))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| AppError::Internal(e.into()))?;

    pdf_extract::extract_text(file.path())
        .map_err(|e| AppError::Document(format!("could not read PDF text: {e}")))
}
