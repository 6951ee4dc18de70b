mod config;
mod errors;
mod interview;
mod keywords;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::orchestrator::Interviewer;
use crate::interview::session_store::SessionStore;
use crate::keywords::curator::KeywordCurator;
use crate::keywords::document::PdfExtractor;
use crate::keywords::extractor::HeuristicNounDetector;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // One connection pool, two temperatures: conversational turns vs. terse curation
    let llm = LlmClient::new(config.google_api_key.clone(), config.gemini_model.clone())?;
    let chat_llm = Arc::new(llm.clone().with_temperature(config.chat_temperature));
    let curation_llm = Arc::new(llm.with_temperature(config.curation_temperature));
    info!("LLM client initialized (model: {})", chat_llm.model());

    // In-memory session store with idle expiry
    let sessions = SessionStore::new(config.session_ttl);
    sessions.spawn_sweeper(config.session_sweep_interval);
    info!(
        "Session store initialized (ttl: {}s, sweep: {}s)",
        config.session_ttl.as_secs(),
        config.session_sweep_interval.as_secs()
    );

    let interviewer = Interviewer::new(sessions.clone(), chat_llm, config.responder_timeout);

    // Build app state
    let state = AppState {
        sessions,
        interviewer: Arc::new(interviewer),
        curator: Arc::new(KeywordCurator::new(curation_llm)),
        documents: Arc::new(PdfExtractor),
        nouns: Arc::new(HeuristicNounDetector),
        max_upload_bytes: config.max_upload_bytes,
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
