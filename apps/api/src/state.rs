use std::sync::Arc;

use crate::analysis::Pipeline;
use crate::config::Config;
use crate::resume::DocumentExtractor;
use crate::results::ResultsStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    /// Pluggable PDF-to-text extractor. Default: PdfTextExtractor.
    pub documents: Arc<dyn DocumentExtractor>,
    /// Latest interview results. Redis when REDIS_URL is set, memory otherwise.
    pub results: Arc<dyn ResultsStore>,
    pub config: Config,
}
