pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::ingest::handlers as ingest;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // File-to-text
        .route(
            "/api/v1/resume/upload",
            post(ingest::handle_upload).layer(upload_limit),
        )
        // Session record and AI operations
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/generate", post(generation::handle_generate))
        .route(
            "/api/v1/session/suggestions/:index/apply",
            post(generation::handle_apply_suggestion),
        )
        .route("/api/v1/session/revert", post(session::handle_revert))
        // Content edits
        .route("/api/v1/session/summary", put(session::handle_set_summary))
        .route("/api/v1/session/contact/:field", put(session::handle_set_contact))
        .route(
            "/api/v1/session/sections/:section",
            put(session::handle_replace_section),
        )
        .route(
            "/api/v1/session/sections/:section/:index/:field",
            put(session::handle_set_record_field),
        )
        .route(
            "/api/v1/session/sections/:section/:index/bullets/:bullet",
            put(session::handle_set_bullet),
        )
        // Placement edits
        .route("/api/v1/session/placement/move", post(session::handle_move))
        .route(
            "/api/v1/session/placement/move-to-page",
            post(session::handle_move_to_page),
        )
        .route("/api/v1/session/placement/delete", post(session::handle_delete))
        // Profile picture, preview and export
        .route(
            "/api/v1/session/profile-picture",
            put(session::handle_set_profile_picture)
                .delete(session::handle_clear_profile_picture)
                .layer(upload_limit),
        )
        .route("/api/v1/session/layout", get(session::handle_layout))
        .route("/api/v1/session/export", get(session::handle_export))
        .with_state(state)
}
