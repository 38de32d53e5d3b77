//! Text Extractor. Turns an uploaded PDF into plain text.
//!
//! Extraction never fails loudly: any problem yields an empty string and the caller
//! decides that an empty result is a bad upload.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Returns the document text with pages concatenated in order, or `""` if unreadable.
    async fn extract(&self, path: &Path) -> String;
}

/// `pdf-extract` backed extractor. Parsing runs on the blocking pool because it is
/// CPU bound and can panic on malformed input; both are contained here.
pub struct PdfTextExtractor {
    timeout: Duration,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self {
            timeout: EXTRACTION_TIMEOUT,
        }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    async fn extract(&self, path: &Path) -> String {
        let owned = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || pdf_extract::extract_text_by_pages(&owned));

        // A blocking task cannot be cancelled. On timeout it is detached and runs to
        // completion on the blocking pool; the document is already in memory by then, so
        // deleting the upload underneath it is harmless.
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(pages))) => {
                let text = pages.concat();
                info!(
                    page_count = pages.len(),
                    chars = text.len(),
                    "PDF text extraction complete"
                );
                text
            }
            Ok(Ok(Err(e))) => {
                warn!("Failed to read PDF: {e}");
                String::new()
            }
            Ok(Err(e)) => {
                warn!("PDF extraction task aborted: {e}");
                String::new()
            }
            Err(_) => {
                warn!("PDF extraction timed out after {:?}", self.timeout);
                String::new()
            }
        }
    }
}
