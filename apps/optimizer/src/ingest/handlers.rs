use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::ingest::parse_resume_file;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub text: String,
}

/// POST /api/v1/resume/upload
///
/// Multipart upload with a single `file` field. The body size limit is set
/// on the route from `MAX_UPLOAD_BYTES`.
pub async fn handle_upload(mut multipart: Multipart) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field.bytes().await?;
        let text = parse_resume_file(&file_name, bytes).await?;
        info!(%file_name, chars = text.chars().count(), "resume file parsed");
        return Ok(Json(UploadResponse { file_name, text }));
    }
    Err(AppError::Validation(format!("Missing multipart field '{FILE_FIELD}'")))
}
