pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::conversation::handlers as conversation;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).put(session::handle_init_session),
        )
        .route(
            "/api/v1/sessions/:id/reset",
            post(session::handle_reset_session),
        )
        .route(
            "/api/v1/sessions/:id/candidate",
            patch(session::handle_update_candidate),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(session::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/report",
            get(session::handle_download_report),
        )
        // Conversation
        .route(
            "/api/v1/sessions/:id/messages",
            post(conversation::handle_send_message),
        )
        .route(
            "/api/v1/sessions/:id/skills",
            put(conversation::handle_declare_skills),
        )
        .route(
            "/api/v1/sessions/:id/summary",
            post(conversation::handle_generate_summary),
        )
        // Persistence
        .route(
            "/api/v1/sessions/:id/snapshots",
            post(storage::handle_save_snapshot),
        )
        .route(
            "/api/v1/snapshots/latest",
            get(storage::handle_latest_snapshot),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
