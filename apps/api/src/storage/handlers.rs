//! Axum route handlers for snapshot persistence.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notice::Notice;
use crate::models::session::Session;
use crate::models::snapshot::AssessmentSnapshot;
use crate::session::handlers::find_session;
use crate::session::view::SessionResponse;
use crate::state::AppState;
use crate::storage::SnapshotStore;

#[derive(Debug, Serialize)]
pub struct LatestSnapshotResponse {
    pub snapshot: Option<AssessmentSnapshot>,
    pub notices: Vec<Notice>,
}

/// Writes the session's snapshot and reports the outcome as a notice.
pub async fn persist_session(store: &SnapshotStore, session: &Session) -> Notice {
    let snapshot = AssessmentSnapshot::capture(session, chrono::Local::now().naive_local());
    match store.write(&snapshot).await {
        Ok(path) => Notice::info(format!("Assessment saved to {}", path.display())),
        Err(e) => {
            error!("Failed to save snapshot: {e}");
            Notice::error(format!("Failed to save data: {e}"))
        }
    }
}

/// POST /api/v1/sessions/:id/snapshots
pub async fn handle_save_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let shared = find_session(&state, id).await?;
    let session = shared.lock().await;
    let notice = persist_session(&state.snapshots, &session).await;
    Ok(Json(SessionResponse::new(id, &session, vec![notice])))
}

/// GET /api/v1/snapshots/latest
///
/// Read failures are treated as "no data" and reported in `notices`.
pub async fn handle_latest_snapshot(State(state): State<AppState>) -> Json<LatestSnapshotResponse> {
    let response = match state.snapshots.latest().await {
        Ok(snapshot) => LatestSnapshotResponse {
            snapshot,
            notices: Vec::new(),
        },
        Err(e) => {
            error!("Failed to load assessment: {e}");
            LatestSnapshotResponse {
                snapshot: None,
                notices: vec![Notice::error(format!("Failed to load assessment: {e}"))],
            }
        }
    };
    Json(response)
}
