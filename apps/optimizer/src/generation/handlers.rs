//! Axum route handlers for the two AI-backed session operations.
//!
//! The session lock is taken before and after the AI call, never across it.
//! The call and its settling step run in a spawned task, so a client that
//! disconnects mid-call cannot leave the request slot in flight.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::AppError;
use crate::generation::generator::{
    user_message, validate_generate_request, GenerateRequest, GENERATION_FAILED_MESSAGE,
    SUGGESTION_FAILED_MESSAGE,
};
use crate::session::handlers::render_session;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplySuggestionRequest {
    pub api_key: Option<String>,
}

/// POST /api/v1/session/generate
///
/// Validates the inputs, calls the AI, and loads the response as the new snapshot.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Value>, AppError> {
    {
        let mut session = state.session()?;
        if let Err(message) = validate_generate_request(&request) {
            session.record_error(message);
            return Err(AppError::Validation(message.to_string()));
        }
        session.begin_generation()?;
    }

    let task = tokio::spawn(async move {
        let outcome = state.ai.generate(&request).await.map_err(|e| {
            warn!("Resume generation failed: {e}");
            user_message(&e, GENERATION_FAILED_MESSAGE)
        });

        let mut session = state.session()?;
        session.finish_generation(outcome)?;
        render_session(&session)
    });
    join(task, "generation").await
}

/// POST /api/v1/session/suggestions/:index/apply
///
/// The response is discarded as stale if the document changed meanwhile.
pub async fn handle_apply_suggestion(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<ApplySuggestionRequest>,
) -> Result<Json<Value>, AppError> {
    let job = {
        let mut session = state.session()?;
        session.begin_suggestion(index)?
    };

    let task = tokio::spawn(async move {
        let outcome = state
            .ai
            .apply_suggestion(&job.document, &job.suggestion, request.api_key.as_deref())
            .await
            .map_err(|e| {
                warn!(suggestion = index, "Applying suggestion failed: {e}");
                user_message(&e, SUGGESTION_FAILED_MESSAGE)
            });

        let mut session = state.session()?;
        session.finish_suggestion(job.ticket, outcome)?;
        render_session(&session)
    });
    join(task, "suggestion").await
}

async fn join(
    task: JoinHandle<Result<Json<Value>, AppError>>,
    label: &str,
) -> Result<Json<Value>, AppError> {
    task.await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("{label} task failed: {e}")))?
}
