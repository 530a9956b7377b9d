//! Axum route handlers for session lifecycle, candidate fields and uploads.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_resume_text, resolve_mime_type};
use crate::models::session::{CandidateField, ResumeFile};
use crate::session::report::render_report;
use crate::session::store::SharedSession;
use crate::session::view::SessionResponse;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateCandidateRequest {
    pub field: CandidateField,
    pub value: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let (id, shared) = state.sessions.create().await;
    let session = shared.lock().await;
    Json(SessionResponse::new(id, &session, Vec::new()))
}

/// PUT /api/v1/sessions/:id
///
/// Initializes a client-chosen session id. Existing sessions are returned untouched.
pub async fn handle_init_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<SessionResponse> {
    let (shared, _) = state.sessions.init(id).await;
    let session = shared.lock().await;
    Json(SessionResponse::new(id, &session, Vec::new()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    Ok(Json(SessionResponse::new(id, &session, Vec::new())))
}

/// POST /api/v1/sessions/:id/reset
///
/// "Start New Screening": wipes everything except the last assessment.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session.reset();
    info!("Reset session {id}");
    Ok(Json(SessionResponse::new(id, &session, Vec::new())))
}

/// PATCH /api/v1/sessions/:id/candidate
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCandidateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    session
        .candidate_info
        .update(request.field, request.value);
    Ok(Json(SessionResponse::new(id, &session, Vec::new())))
}

/// POST /api/v1/sessions/:id/resume
///
/// Accepts one multipart `file` field. Extraction failures are reported as
/// notices; image resumes are left for the next chat turn.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;

    if session.candidate_info.resume_file.is_some() {
        return Err(AppError::UnprocessableEntity(
            "A resume has already been uploaded. Start a new screening to replace it.".to_string(),
        ));
    }

    let file = read_upload(&mut multipart).await?;
    info!(
        "Session {id}: received resume {} ({}, {} bytes)",
        file.file_name, file.mime_type, file.size_bytes
    );

    let extraction = extract_resume_text(&file).await;
    session.candidate_info.resume_file = Some(file);
    session
        .candidate_info
        .update(CandidateField::ResumeText, extraction.text);

    Ok(Json(SessionResponse::new(
        id,
        &session,
        extraction.notice.into_iter().collect(),
    )))
}

/// GET /api/v1/sessions/:id/report
///
/// "Download Report": Markdown attachment with candidate details, skills and assessment.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;

    let report = render_report(&session).ok_or_else(|| {
        AppError::UnprocessableEntity(
            "No assessment available yet. Generate a summary first.".to_string(),
        )
    })?;

    let file_name = format!(
        "talentscout_report_{}.md",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/markdown; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        report,
    ))
}

async fn read_upload(multipart: &mut Multipart) -> Result<ResumeFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let mime_type = resolve_mime_type(field.content_type(), &file_name);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        return Ok(ResumeFile::new(file_name, mime_type, data));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}
