//! Resume Generation: the two AI operations a session depends on.
//!
//! `ResumeAi` is the seam between the session and the AI provider. The
//! production implementation is `LlmClient`; handler tests swap in a fake.
//! Both operations are single attempts with no retry.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::generation::prompts::{
    APPLY_SUGGESTION_PROMPT_TEMPLATE, GENERATION_PROMPT_TEMPLATE, RESUME_SYSTEM, TARGET_BLOCK_HEADER,
};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, RESUME_JSON_SHAPE};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::{ContactInfo, Feedback, GenerationResponse, ResumeDocument};

/// Number of strengths and of improvements a response must carry.
pub const FEEDBACK_ITEMS: usize = 3;

pub const MISSING_FIELDS_MESSAGE: &str =
    "Please fill in all required fields: Name, Email, Resume, and either Desired Role or Job Description.";
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate the resume. Please check your inputs and API key, then try again.";
pub const SUGGESTION_FAILED_MESSAGE: &str =
    "Failed to apply the suggestion. Please check your API key and try again.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for resume generation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub personal_info: ContactInfo,
    pub resume_text: String,
    pub job_description: Option<String>,
    pub desired_role: Option<String>,
    /// Overrides the configured default key for this call.
    pub api_key: Option<String>,
}

impl GenerateRequest {
    pub fn job_description(&self) -> Option<&str> {
        non_blank(self.job_description.as_deref())
    }

    pub fn desired_role(&self) -> Option<&str> {
        non_blank(self.desired_role.as_deref())
    }

    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Name, email and resume text are required, plus a role or a job description.
pub fn validate_generate_request(request: &GenerateRequest) -> Result<(), &'static str> {
    let required = [
        request.personal_info.name.as_str(),
        request.personal_info.email.as_str(),
        request.resume_text.as_str(),
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(MISSING_FIELDS_MESSAGE);
    }
    if request.desired_role().is_none() && request.job_description().is_none() {
        return Err(MISSING_FIELDS_MESSAGE);
    }
    Ok(())
}

/// Rejects feedback that does not hold exactly three non-empty entries per list.
pub fn validate_feedback(feedback: &Feedback) -> Result<(), LlmError> {
    for (label, items) in [("strengths", &feedback.strengths), ("improvements", &feedback.improvements)] {
        if items.len() != FEEDBACK_ITEMS {
            return Err(LlmError::NonConforming(format!(
                "expected {FEEDBACK_ITEMS} {label}, got {}",
                items.len()
            )));
        }
        if items.iter().any(|item| item.trim().is_empty()) {
            return Err(LlmError::NonConforming(format!("empty entry in {label}")));
        }
    }
    Ok(())
}

/// The message shown to the user for a failed AI call.
///
/// A missing key keeps its own instructions; everything else is wrapped in
/// `fallback` so provider details stay in the logs.
pub fn user_message(err: &LlmError, fallback: &str) -> String {
    match err {
        LlmError::MissingApiKey => err.to_string(),
        _ => fallback.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

fn system_prompt() -> String {
    format!("{RESUME_SYSTEM} {JSON_ONLY_SYSTEM}")
}

fn target_block(request: &GenerateRequest) -> String {
    let mut target = String::new();
    if let Some(role) = request.desired_role() {
        target.push_str(&format!("\n- Target Role: {role}"));
    }
    if let Some(jd) = request.job_description() {
        target.push_str(&format!("\n- Target Job Description:\n---\n{jd}\n---"));
    }
    if target.is_empty() {
        target
    } else {
        format!("{TARGET_BLOCK_HEADER}{target}")
    }
}

pub fn build_generation_prompt(request: &GenerateRequest) -> Result<String, LlmError> {
    let personal_details = serde_json::to_string(&request.personal_info)?;
    Ok(GENERATION_PROMPT_TEMPLATE
        .replace("{personal_details_json}", &personal_details)
        .replace("{resume_text}", &request.resume_text)
        .replace("{target_block}", &target_block(request))
        .replace("{resume_shape}", RESUME_JSON_SHAPE))
}

pub fn build_apply_suggestion_prompt(document: &ResumeDocument, suggestion: &str) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string_pretty(document)?;
    Ok(APPLY_SUGGESTION_PROMPT_TEMPLATE
        .replace("{suggestion}", suggestion)
        .replace("{resume_json}", &resume_json)
        .replace("{resume_shape}", RESUME_JSON_SHAPE))
}

// ────────────────────────────────────────────────────────────────────────────
// AI seam
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ResumeAi: Send + Sync {
    /// Feedback plus an optimized resume for the given inputs.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResponse, LlmError>;

    /// A full replacement document that addresses `suggestion`.
    async fn apply_suggestion(
        &self,
        document: &ResumeDocument,
        suggestion: &str,
        api_key: Option<&str>,
    ) -> Result<ResumeDocument, LlmError>;
}

#[async_trait]
impl ResumeAi for LlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResponse, LlmError> {
        let prompt = build_generation_prompt(request)?;
        let response: GenerationResponse = self
            .call_json(&prompt, &system_prompt(), request.api_key())
            .await?;

        if let Err(e) = validate_feedback(&response.feedback) {
            warn!("Generation response rejected: {e}");
            return Err(e);
        }

        info!(
            model = self.model(),
            sections = response.optimized_resume.present_sections().len(),
            "resume generated"
        );
        Ok(response)
    }

    async fn apply_suggestion(
        &self,
        document: &ResumeDocument,
        suggestion: &str,
        api_key: Option<&str>,
    ) -> Result<ResumeDocument, LlmError> {
        let prompt = build_apply_suggestion_prompt(document, suggestion)?;
        let revised: ResumeDocument = self.call_json(&prompt, &system_prompt(), api_key).await?;
        info!(model = self.model(), "suggestion applied by model");
        Ok(revised)
    }
}
