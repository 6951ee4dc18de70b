//! Axum route handlers for the interview API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// POST /chat
///
/// Runs one interview turn. Missing fields are a 400; a Responder failure is a
/// 500 and leaves the user's message in the session history.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;

    let response = state
        .interviewer
        .handle_turn(
            request.session_id.as_deref().unwrap_or_default(),
            request.message.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(ChatResponse { response }))
}

/// GET /sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session.snapshot()))
}

/// DELETE /sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.delete(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Session {session_id} not found"
        )))
    }
}
