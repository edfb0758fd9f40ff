//! Axum route handlers for the edit session: content edits, placement edits,
//! revert, profile picture, layout preview and PDF export.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::layout::{MoveDirection, PaintProgram, StaticMeasurer};
use crate::models::SectionKey;
use crate::render::{decode_data_url, write_pdf};
use crate::session::{ContactField, EditSession, SectionValue};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of every single-value edit.
#[derive(Debug, Deserialize)]
pub struct ValueBody<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub page: usize,
    pub index: usize,
    pub direction: MoveDirection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveToPageRequest {
    pub from_page: usize,
    pub from_index: usize,
    pub to_page: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    pub page: usize,
    pub index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureRequest {
    pub data_url: String,
}

/// The session record as returned by every session endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse<'a> {
    status: &'static str,
    has_profile_image: bool,
    #[serde(flatten)]
    session: &'a EditSession,
}

/// Serializes the session while the caller still holds the lock.
pub fn render_session(session: &EditSession) -> Result<Json<Value>, AppError> {
    let response = SessionResponse {
        status: if session.is_populated() { "populated" } else { "empty" },
        has_profile_image: session.profile_image().is_some(),
        session,
    };
    serde_json::to_value(response)
        .map(Json)
        .map_err(|e| AppError::Internal(e.into()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let session = state.session()?;
    render_session(&session)
}

/// POST /api/v1/session/revert
pub async fn handle_revert(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.revert()?;
    render_session(&session)
}

/// PUT /api/v1/session/summary
pub async fn handle_set_summary(
    State(state): State<AppState>,
    Json(body): Json<ValueBody<String>>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.set_summary(body.value)?;
    render_session(&session)
}

/// PUT /api/v1/session/contact/:field
pub async fn handle_set_contact(
    State(state): State<AppState>,
    Path(field): Path<ContactField>,
    Json(body): Json<ValueBody<String>>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.set_contact_field(field, body.value)?;
    render_session(&session)
}

/// PUT /api/v1/session/sections/:section
///
/// Replaces the whole section. The body's `value` must match the section's shape.
pub async fn handle_replace_section(
    State(state): State<AppState>,
    Path(section): Path<SectionKey>,
    Json(body): Json<ValueBody<Value>>,
) -> Result<Json<Value>, AppError> {
    let value: SectionValue = serde_json::from_value(json!({
        "section": section.as_str(),
        "value": body.value,
    }))
    .map_err(|e| AppError::Validation(format!("Invalid value for {section}: {e}")))?;

    let mut session = state.session()?;
    session.replace_section(value)?;
    render_session(&session)
}

/// PUT /api/v1/session/sections/:section/:index/:field
pub async fn handle_set_record_field(
    State(state): State<AppState>,
    Path((section, index, field)): Path<(SectionKey, usize, String)>,
    Json(body): Json<ValueBody<String>>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.set_record_field(section, index, &field, body.value)?;
    render_session(&session)
}

/// PUT /api/v1/session/sections/:section/:index/bullets/:bullet
pub async fn handle_set_bullet(
    State(state): State<AppState>,
    Path((section, index, bullet)): Path<(SectionKey, usize, usize)>,
    Json(body): Json<ValueBody<String>>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.set_bullet(section, index, bullet, body.value)?;
    render_session(&session)
}

/// POST /api/v1/session/placement/move
///
/// Out-of-range positions are a no-op, not an error.
pub async fn handle_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.move_section(req.page, req.index, req.direction)?;
    render_session(&session)
}

/// POST /api/v1/session/placement/move-to-page
pub async fn handle_move_to_page(
    State(state): State<AppState>,
    Json(req): Json<MoveToPageRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.move_section_to_page(req.from_page, req.from_index, req.to_page)?;
    render_session(&session)
}

/// POST /api/v1/session/placement/delete
pub async fn handle_delete(
    State(state): State<AppState>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.delete_section(req.page, req.index)?;
    render_session(&session)
}

/// PUT /api/v1/session/profile-picture
pub async fn handle_set_profile_picture(
    State(state): State<AppState>,
    Json(req): Json<ProfilePictureRequest>,
) -> Result<Json<Value>, AppError> {
    let image = tokio::task::spawn_blocking(move || decode_data_url(&req.data_url))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("image decode task failed: {e}")))??;
    info!(width = image.width, height = image.height, "profile picture set");

    let mut session = state.session()?;
    session.set_profile_image(Some(image));
    render_session(&session)
}

/// DELETE /api/v1/session/profile-picture
pub async fn handle_clear_profile_picture(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let mut session = state.session()?;
    session.set_profile_image(None);
    render_session(&session)
}

/// GET /api/v1/session/layout
pub async fn handle_layout(State(state): State<AppState>) -> Result<Json<PaintProgram>, AppError> {
    let session = state.session()?;
    let program = session.paint(&StaticMeasurer, &state.page_config)?;
    Ok(Json(program))
}

/// GET /api/v1/session/export
///
/// Paginates under the lock, then writes the PDF off the async runtime.
pub async fn handle_export(State(state): State<AppState>) -> Result<Response, AppError> {
    let (program, image) = {
        let session = state.session()?;
        let program = session.paint(&StaticMeasurer, &state.page_config)?;
        (program, session.profile_image().cloned())
    };
    let file_name = program.file_name.clone();
    let pages = program.pages.len();

    let bytes = tokio::task::spawn_blocking(move || write_pdf(&program, image.as_ref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF task failed: {e}")))??;
    info!(%file_name, pages, size = bytes.len(), "resume exported");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
