pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::keywords::handlers as keywords;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/ping", get(health::ping_handler))
        // Keyword API
        .route("/upload-resume", post(keywords::handle_upload_resume))
        .route("/set-keywords", post(keywords::handle_set_keywords))
        // Interview API
        .route("/chat", post(interview::handle_chat))
        .route(
            "/sessions/:id",
            get(interview::handle_get_session).delete(interview::handle_delete_session),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
