use std::sync::Arc;

use crate::analysis::extractor::TextExtractor;
use crate::analysis::uploads::UploadDir;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main`; tests build it with substitute collaborators.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable LLM backend. Default: GeminiClient.
    pub llm: Arc<dyn LlmClient>,
    /// Pluggable text extractor. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    pub uploads: UploadDir,
    pub config: Config,
}
