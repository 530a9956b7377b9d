//! Axum route handlers for chat turns, skill declaration and summaries.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::conversation::driver::run_turn;
use crate::conversation::skills::parse_tech_stack;
use crate::conversation::summary::{generate_summary, SummaryOutcome};
use crate::errors::AppError;
use crate::models::notice::Notice;
use crate::session::handlers::find_session;
use crate::session::view::SessionResponse;
use crate::state::AppState;
use crate::storage::handlers::persist_session;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DeclareSkillsRequest {
    pub skills: String,
}

/// POST /api/v1/sessions/:id/messages
///
/// One chat turn. The session stays locked until the model answers, so
/// turns within a session never interleave.
pub async fn handle_send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;

    if session.conversation_ended {
        return Err(AppError::UnprocessableEntity(
            "This screening has ended. Start a new screening to continue.".to_string(),
        ));
    }

    let notices = run_turn(&mut session, &request.content, state.llm.as_ref()).await;
    Ok(Json(SessionResponse::new(id, &session, notices)))
}

/// PUT /api/v1/sessions/:id/skills
pub async fn handle_declare_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DeclareSkillsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let skills = parse_tech_stack(&request.skills);
    if skills.is_empty() {
        return Err(AppError::Validation(
            "skills must list at least one technology".to_string(),
        ));
    }

    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;
    info!("Session {id}: declared {} skills", skills.len());
    session.set_tech_stack(skills);
    Ok(Json(SessionResponse::new(id, &session, Vec::new())))
}

/// POST /api/v1/sessions/:id/summary
///
/// "Generate Summary": evaluates the whole transcript, ends the conversation
/// and saves a snapshot. A failed call leaves the session unchanged.
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let mut session = shared.lock().await;

    let outcome = generate_summary(&session.messages, state.llm.as_ref()).await;
    let notice = match outcome {
        SummaryOutcome::Generated(text) => {
            session.final_assessment = Some(text);
            session.assessment_complete = true;
            session.conversation_ended = true;
            persist_session(&state.snapshots, &session).await
        }
        SummaryOutcome::Failed(message) => Notice::error(message),
        SummaryOutcome::NothingToSummarize => {
            return Err(AppError::UnprocessableEntity(
                "There is no conversation to summarize yet.".to_string(),
            ))
        }
    };

    Ok(Json(SessionResponse::new(id, &session, vec![notice])))
}
