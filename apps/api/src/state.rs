use std::sync::Arc;

use crate::interview::orchestrator::Interviewer;
use crate::interview::session_store::SessionStore;
use crate::keywords::curator::KeywordCurator;
use crate::keywords::document::DocumentExtractor;
use crate::keywords::extractor::NounDetector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub interviewer: Arc<Interviewer>,
    pub curator: Arc<KeywordCurator>,
    /// Pluggable document reader. Default: PdfExtractor.
    pub documents: Arc<dyn DocumentExtractor>,
    /// Pluggable noun detector. Default: HeuristicNounDetector.
    pub nouns: Arc<dyn NounDetector>,
    /// Request body cap applied to resume uploads.
    pub max_upload_bytes: usize,
}
