//! Axum route handlers for the keyword API.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::keywords::extractor::extract_candidates;
use crate::keywords::KeywordSet;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetKeywordsRequest {
    pub session_id: Option<String>,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SetKeywordsResponse {
    pub success: bool,
    /// The normalized set actually stored.
    pub keywords: KeywordSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResumeResponse {
    pub keywords: KeywordSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload-resume
///
/// Multipart fields: `resume` (PDF file, required), `sessionId` (text, optional).
/// Runs text extraction -> candidate ranking -> curation and returns the curated
/// keywords. When `sessionId` is given and curation produced keywords, they are
/// also stored for that session.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResumeResponse>, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut session_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => resume = Some(field.bytes().await.map_err(multipart_error)?),
            Some("sessionId") => {
                // Session ids are opaque: stored exactly as sent, like /chat and /set-keywords.
                let value = field.text().await.map_err(multipart_error)?;
                if !value.trim().is_empty() {
                    session_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let resume = resume
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;
    info!("Resume upload received ({} bytes)", resume.len());

    let text = state.documents.extract_text(resume).await?;
    let candidates = extract_candidates(&text, state.nouns.as_ref());
    info!("Extracted {} keyword candidates", candidates.len());

    let keywords = state.curator.curate(&candidates).await;

    if let Some(id) = &session_id {
        if keywords.is_empty() {
            warn!("Curation produced no keywords; leaving session {id} unchanged");
        } else {
            state.sessions.set_keywords(id, keywords.iter());
        }
    }

    Ok(Json(UploadResumeResponse {
        keywords,
        session_id,
    }))
}

/// POST /set-keywords
///
/// Replaces the session's keyword set. The whole batch is rejected when the
/// payload is malformed; nothing is stored in that case.
pub async fn handle_set_keywords(
    State(state): State<AppState>,
    payload: Result<Json<SetKeywordsRequest>, JsonRejection>,
) -> Result<Json<SetKeywordsResponse>, AppError> {
    let Json(request) = payload?;

    let session_id = request.session_id.filter(|id| !id.trim().is_empty());
    let (Some(session_id), Some(keywords)) = (session_id, request.keywords) else {
        warn!("Invalid input for /set-keywords");
        return Err(AppError::Validation(
            "Invalid input: sessionId and keywords are required".to_string(),
        ));
    };

    let stored = state.sessions.set_keywords(&session_id, &keywords);

    Ok(Json(SetKeywordsResponse {
        success: true,
        keywords: stored,
    }))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {}", e.body_text()))
}
