//! Edit Session Controller: the single mutable copy of the resume.
//!
//! # States
//! - Empty: no AI response has been loaded yet. Every edit is rejected.
//! - Populated: a `Workspace` holds the immutable snapshot, the working
//!   document and its placement. A new snapshot replaces the workspace
//!   wholesale; there is no way back to Empty.
//!
//! # Versioning
//! `epoch` changes whenever the working document is re-seeded from a snapshot
//! (new generation or revert); `revision` counts content edits within an
//! epoch. An apply-suggestion response is accepted only if both still match
//! the values captured when the request started.
//!
//! All methods are synchronous. Callers hold the session mutex for the
//! duration of one call and never across an `.await`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::layout::{paginate, MoveDirection, PageConfig, PaintProgram, PlacementModel, TextMeasurer};
use crate::models::{
    Certification, ContactInfo, Education, Experience, ExtraCourse, GenerationResponse, Project,
    ResumeDocument, SectionKey,
};
use crate::render::ProfileImage;
use crate::session::requests::{RequestState, RequestTicket};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No resume has been generated yet")]
    NotPopulated,

    #[error("{section} has no entry at index {index}")]
    IndexOutOfRange { section: SectionKey, index: usize },

    #[error("{section} entry {index} has no bullet at index {bullet}")]
    BulletOutOfRange {
        section: SectionKey,
        index: usize,
        bullet: usize,
    },

    #[error("Unknown field '{field}' for {section}")]
    UnknownField { section: SectionKey, field: String },

    #[error("{0} is not a list of records")]
    NotARecordSection(SectionKey),

    #[error("{0} entries have no bullet points")]
    NoBullets(SectionKey),

    #[error("There is no suggestion at index {0}")]
    SuggestionOutOfRange(usize),

    #[error("Suggestion {0} has already been applied")]
    SuggestionAlreadyApplied(usize),

    #[error("A {0} request is already in progress")]
    RequestInFlight(&'static str),

    #[error("The resume changed while the suggestion was being applied; the result was discarded")]
    Stale,

    /// User-facing failure message of an AI call.
    #[error("{0}")]
    AiFailed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Edit payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Linkedin,
}

/// A whole section's new content, tagged by section key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "value", rename_all = "camelCase")]
pub enum SectionValue {
    Summary(String),
    Skills(Vec<String>),
    Experience(Vec<Experience>),
    Projects(Vec<Project>),
    Education(Vec<Education>),
    Certifications(Vec<Certification>),
    ExtraCourses(Vec<ExtraCourse>),
    Languages(Vec<String>),
}

impl SectionValue {
    pub fn key(&self) -> SectionKey {
        match self {
            SectionValue::Summary(_) => SectionKey::Summary,
            SectionValue::Skills(_) => SectionKey::Skills,
            SectionValue::Experience(_) => SectionKey::Experience,
            SectionValue::Projects(_) => SectionKey::Projects,
            SectionValue::Education(_) => SectionKey::Education,
            SectionValue::Certifications(_) => SectionKey::Certifications,
            SectionValue::ExtraCourses(_) => SectionKey::ExtraCourses,
            SectionValue::Languages(_) => SectionKey::Languages,
        }
    }

    fn apply(self, doc: &mut ResumeDocument) {
        match self {
            SectionValue::Summary(v) => doc.summary = v,
            SectionValue::Skills(v) => doc.skills = v,
            SectionValue::Experience(v) => doc.experience = v,
            SectionValue::Projects(v) => doc.projects = v,
            SectionValue::Education(v) => doc.education = v,
            SectionValue::Certifications(v) => doc.certifications = v,
            SectionValue::ExtraCourses(v) => doc.extra_courses = v,
            SectionValue::Languages(v) => doc.languages = v,
        }
    }
}

/// Everything an apply-suggestion call needs once the lock is released.
#[derive(Debug, Clone)]
pub struct SuggestionJob {
    pub ticket: RequestTicket,
    pub document: ResumeDocument,
    pub suggestion: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Workspace
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    epoch: Uuid,
    revision: u64,
    snapshot: GenerationResponse,
    document: ResumeDocument,
    placement: PlacementModel,
    applied_suggestions: BTreeSet<usize>,
    suggestion_errors: BTreeMap<usize, String>,
    loaded_at: DateTime<Utc>,
}

impl Workspace {
    fn seed(snapshot: GenerationResponse, page_count: usize) -> Self {
        let document = snapshot.optimized_resume.clone();
        let placement = PlacementModel::initial(&document, page_count);
        Self {
            epoch: Uuid::new_v4(),
            revision: 0,
            snapshot,
            document,
            placement,
            applied_suggestions: BTreeSet::new(),
            suggestion_errors: BTreeMap::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn epoch(&self) -> Uuid {
        self.epoch
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> &GenerationResponse {
        &self.snapshot
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    pub fn placement(&self) -> &PlacementModel {
        &self.placement
    }

    pub fn applied_suggestions(&self) -> &BTreeSet<usize> {
        &self.applied_suggestions
    }

    pub fn suggestion_errors(&self) -> &BTreeMap<usize, String> {
        &self.suggestion_errors
    }

    fn ticket(&self, suggestion: usize) -> RequestTicket {
        RequestTicket {
            epoch: self.epoch,
            revision: self.revision,
            suggestion,
        }
    }

    /// Swaps in a new working document, keeping the placement consistent.
    fn commit(&mut self, next: ResumeDocument) {
        self.placement.reconcile(&self.document, &next);
        self.document = next;
        self.revision += 1;
        debug_assert!(self.placement.is_consistent_with(&self.document));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSession {
    page_count: usize,
    workspace: Option<Workspace>,
    #[serde(skip)]
    profile_image: Option<ProfileImage>,
    generation: RequestState,
    suggestion: RequestState,
    last_error: Option<String>,
}

impl EditSession {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            workspace: None,
            profile_image: None,
            generation: RequestState::Idle,
            suggestion: RequestState::Idle,
            last_error: None,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.workspace.is_some()
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn profile_image(&self) -> Option<&ProfileImage> {
        self.profile_image.as_ref()
    }

    pub fn set_profile_image(&mut self, image: Option<ProfileImage>) {
        self.profile_image = image;
    }

    fn workspace_mut(&mut self) -> Result<&mut Workspace, SessionError> {
        self.workspace.as_mut().ok_or(SessionError::NotPopulated)
    }

    /// Replaces all state with a fresh snapshot.
    pub fn load_snapshot(&mut self, snapshot: GenerationResponse) {
        let workspace = Workspace::seed(snapshot, self.page_count);
        info!(
            epoch = %workspace.epoch,
            sections = workspace.document.present_sections().len(),
            "snapshot loaded"
        );
        self.workspace = Some(workspace);
        self.last_error = None;
    }

    /// Restores the snapshot document and the canonical placement.
    pub fn revert(&mut self) -> Result<(), SessionError> {
        let page_count = self.page_count;
        let ws = self.workspace_mut()?;
        let snapshot = ws.snapshot.clone();
        *ws = Workspace::seed(snapshot, page_count);
        info!(epoch = %ws.epoch, "reverted to snapshot");
        Ok(())
    }

    // ── content edits ───────────────────────────────────────────────────────

    /// Runs `edit` on a copy of the document; commits only if it succeeds.
    fn edit<F>(&mut self, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut ResumeDocument) -> Result<(), SessionError>,
    {
        let ws = self.workspace_mut()?;
        let mut next = ws.document.clone();
        edit(&mut next)?;
        ws.commit(next);
        debug!(revision = ws.revision, "document edited");
        Ok(())
    }

    pub fn set_summary(&mut self, value: String) -> Result<(), SessionError> {
        self.edit(|doc| {
            doc.summary = value;
            Ok(())
        })
    }

    pub fn set_contact_field(&mut self, field: ContactField, value: String) -> Result<(), SessionError> {
        self.edit(|doc| {
            *contact_slot(&mut doc.contact_info, field) = value;
            Ok(())
        })
    }

    pub fn replace_section(&mut self, value: SectionValue) -> Result<(), SessionError> {
        self.edit(|doc| {
            value.apply(doc);
            Ok(())
        })
    }

    pub fn set_record_field(
        &mut self,
        section: SectionKey,
        index: usize,
        field: &str,
        value: String,
    ) -> Result<(), SessionError> {
        self.edit(|doc| {
            *record_field(doc, section, index, field)? = value;
            Ok(())
        })
    }

    pub fn set_bullet(
        &mut self,
        section: SectionKey,
        index: usize,
        bullet: usize,
        value: String,
    ) -> Result<(), SessionError> {
        self.edit(|doc| {
            let slot = bullets_mut(doc, section, index)?
                .get_mut(bullet)
                .ok_or(SessionError::BulletOutOfRange {
                    section,
                    index,
                    bullet,
                })?;
            *slot = value;
            Ok(())
        })
    }

    // ── placement edits ─────────────────────────────────────────────────────

    pub fn move_section(&mut self, page: usize, index: usize, direction: MoveDirection) -> Result<bool, SessionError> {
        let changed = self.workspace_mut()?.placement.move_within_page(page, index, direction);
        debug!(page, index, ?direction, changed, "move within page");
        Ok(changed)
    }

    pub fn move_section_to_page(
        &mut self,
        from_page: usize,
        from_index: usize,
        to_page: usize,
    ) -> Result<bool, SessionError> {
        let changed = self
            .workspace_mut()?
            .placement
            .move_to_page(from_page, from_index, to_page);
        debug!(from_page, from_index, to_page, changed, "move to page");
        Ok(changed)
    }

    pub fn delete_section(&mut self, page: usize, index: usize) -> Result<Option<SectionKey>, SessionError> {
        let removed = self.workspace_mut()?.placement.delete_section(page, index);
        debug!(page, index, ?removed, "delete section");
        Ok(removed)
    }

    // ── generation ──────────────────────────────────────────────────────────

    /// Records a user-visible error without touching the workspace.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn begin_generation(&mut self) -> Result<(), SessionError> {
        if !self.generation.begin() {
            return Err(SessionError::RequestInFlight("generation"));
        }
        self.last_error = None;
        Ok(())
    }

    /// Settles the generation request. On failure the previous state is kept.
    pub fn finish_generation(&mut self, outcome: Result<GenerationResponse, String>) -> Result<(), SessionError> {
        self.generation.settle();
        match outcome {
            Ok(snapshot) => {
                self.load_snapshot(snapshot);
                Ok(())
            }
            Err(message) => {
                self.last_error = Some(message.clone());
                Err(SessionError::AiFailed(message))
            }
        }
    }

    // ── apply suggestion ────────────────────────────────────────────────────

    pub fn begin_suggestion(&mut self, index: usize) -> Result<SuggestionJob, SessionError> {
        let in_flight = self.suggestion.is_in_flight();
        let ws = self.workspace.as_mut().ok_or(SessionError::NotPopulated)?;
        let suggestion = ws
            .snapshot
            .feedback
            .improvements
            .get(index)
            .cloned()
            .ok_or(SessionError::SuggestionOutOfRange(index))?;
        if ws.applied_suggestions.contains(&index) {
            return Err(SessionError::SuggestionAlreadyApplied(index));
        }
        if in_flight {
            return Err(SessionError::RequestInFlight("apply-suggestion"));
        }

        ws.suggestion_errors.remove(&index);
        let job = SuggestionJob {
            ticket: ws.ticket(index),
            document: ws.document.clone(),
            suggestion,
        };
        self.suggestion.begin();
        Ok(job)
    }

    /// Settles an apply-suggestion request issued with `ticket`.
    pub fn finish_suggestion(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<ResumeDocument, String>,
    ) -> Result<(), SessionError> {
        self.suggestion.settle();
        let ws = self.workspace.as_mut().ok_or(SessionError::Stale)?;
        if ws.epoch != ticket.epoch || ws.revision != ticket.revision {
            warn!(
                suggestion = ticket.suggestion,
                issued_revision = ticket.revision,
                current_revision = ws.revision,
                "discarding stale suggestion response"
            );
            return Err(SessionError::Stale);
        }

        match outcome {
            Ok(document) => {
                ws.commit(document);
                ws.applied_suggestions.insert(ticket.suggestion);
                info!(suggestion = ticket.suggestion, revision = ws.revision, "suggestion applied");
                Ok(())
            }
            Err(message) => {
                ws.suggestion_errors.insert(ticket.suggestion, message.clone());
                Err(SessionError::AiFailed(message))
            }
        }
    }

    // ── export ──────────────────────────────────────────────────────────────

    pub fn paint<M: TextMeasurer + ?Sized>(
        &self,
        measurer: &M,
        config: &PageConfig,
    ) -> Result<PaintProgram, SessionError> {
        let ws = self.workspace.as_ref().ok_or(SessionError::NotPopulated)?;
        let program = paginate(
            &ws.document,
            &ws.placement,
            self.profile_image.is_some(),
            measurer,
            config,
        );
        info!(pages = program.pages.len(), file_name = %program.file_name, "resume paginated");
        Ok(program)
    }
}

fn contact_slot(contact: &mut ContactInfo, field: ContactField) -> &mut String {
    match field {
        ContactField::Name => &mut contact.name,
        ContactField::Email => &mut contact.email,
        ContactField::Phone => &mut contact.phone,
        ContactField::Linkedin => &mut contact.linkedin,
    }
}

fn record_field<'a>(
    doc: &'a mut ResumeDocument,
    section: SectionKey,
    index: usize,
    field: &str,
) -> Result<&'a mut String, SessionError> {
    let out_of_range = || SessionError::IndexOutOfRange { section, index };
    let unknown = || SessionError::UnknownField {
        section,
        field: field.to_string(),
    };

    match section {
        SectionKey::Experience => {
            let record = doc.experience.get_mut(index).ok_or_else(out_of_range)?;
            match field {
                "role" => Ok(&mut record.role),
                "company" => Ok(&mut record.company),
                "dates" => Ok(&mut record.dates),
                _ => Err(unknown()),
            }
        }
        SectionKey::Projects => {
            let record = doc.projects.get_mut(index).ok_or_else(out_of_range)?;
            match field {
                "name" => Ok(&mut record.name),
                _ => Err(unknown()),
            }
        }
        SectionKey::Education => {
            let record = doc.education.get_mut(index).ok_or_else(out_of_range)?;
            match field {
                "institution" => Ok(&mut record.institution),
                "degree" => Ok(&mut record.degree),
                "dates" => Ok(&mut record.dates),
                _ => Err(unknown()),
            }
        }
        SectionKey::Certifications => {
            let record = doc.certifications.get_mut(index).ok_or_else(out_of_range)?;
            match field {
                "name" => Ok(&mut record.name),
                "authority" => Ok(&mut record.authority),
                "date" => Ok(&mut record.date),
                _ => Err(unknown()),
            }
        }
        SectionKey::ExtraCourses => {
            let record = doc.extra_courses.get_mut(index).ok_or_else(out_of_range)?;
            match field {
                "name" => Ok(&mut record.name),
                "institution" => Ok(&mut record.institution),
                "dates" => Ok(&mut record.dates),
                _ => Err(unknown()),
            }
        }
        SectionKey::Summary | SectionKey::Skills | SectionKey::Languages => {
            Err(SessionError::NotARecordSection(section))
        }
    }
}

fn bullets_mut(
    doc: &mut ResumeDocument,
    section: SectionKey,
    index: usize,
) -> Result<&mut Vec<String>, SessionError> {
    let out_of_range = SessionError::IndexOutOfRange { section, index };
    match section {
        SectionKey::Experience => doc
            .experience
            .get_mut(index)
            .map(|e| &mut e.bullets)
            .ok_or(out_of_range),
        SectionKey::Projects => doc
            .projects
            .get_mut(index)
            .map(|p| &mut p.bullets)
            .ok_or(out_of_range),
        _ => Err(SessionError::NoBullets(section)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_page_config, StaticMeasurer};
    use crate::models::Feedback;

    fn make_response() -> GenerationResponse {
        GenerationResponse {
            feedback: Feedback {
                strengths: vec!["Clear".into(), "Concise".into(), "Relevant".into()],
                improvements: vec!["Quantify".into(), "Add projects".into(), "Trim skills".into()],
            },
            optimized_resume: ResumeDocument {
                contact_info: ContactInfo {
                    name: "Jane Doe".into(),
                    email: "jane@x.com".into(),
                    ..Default::default()
                },
                summary: "Platform engineer".into(),
                skills: vec!["Rust".into(), "Kubernetes".into()],
                experience: vec![Experience {
                    role: "Engineer".into(),
                    company: "Acme".into(),
                    dates: "2020 - 2024".into(),
                    bullets: vec!["Built CI".into(), "Cut costs".into()],
                }],
                education: vec![Education {
                    institution: "MIT".into(),
                    degree: "BSc".into(),
                    dates: "2016 - 2020".into(),
                }],
                ..Default::default()
            },
        }
    }

    fn make_session() -> EditSession {
        let mut session = EditSession::new(3);
        session.load_snapshot(make_response());
        session
    }

    fn ws(session: &EditSession) -> &Workspace {
        session.workspace().unwrap()
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    #[test]
    fn test_empty_session_rejects_edits() {
        let mut session = EditSession::new(2);
        assert!(!session.is_populated());
        assert!(matches!(session.set_summary("x".into()), Err(SessionError::NotPopulated)));
        assert!(matches!(session.revert(), Err(SessionError::NotPopulated)));
        assert!(matches!(
            session.move_section(0, 0, MoveDirection::Up),
            Err(SessionError::NotPopulated)
        ));
        assert!(matches!(
            session.paint(&StaticMeasurer, &default_page_config()),
            Err(SessionError::NotPopulated)
        ));
    }

    #[test]
    fn test_load_snapshot_seeds_document_and_placement() {
        let session = make_session();
        let ws = ws(&session);
        assert_eq!(ws.document(), &make_response().optimized_resume);
        assert_eq!(ws.placement().page_count(), 3);
        assert_eq!(
            ws.placement().pages()[0],
            vec![
                SectionKey::Summary,
                SectionKey::Skills,
                SectionKey::Experience,
                SectionKey::Education
            ]
        );
        assert_eq!(ws.revision(), 0);
    }

    #[test]
    fn test_new_snapshot_replaces_state() {
        let mut session = make_session();
        let first_epoch = ws(&session).epoch();
        session.set_summary("edited".into()).unwrap();
        session.load_snapshot(make_response());
        assert_ne!(ws(&session).epoch(), first_epoch);
        assert_eq!(ws(&session).document().summary, "Platform engineer");
    }

    // ── content edits ───────────────────────────────────────────────────────

    #[test]
    fn test_blank_summary_removes_it_from_placement() {
        let mut session = make_session();
        session.set_summary("   ".into()).unwrap();
        assert!(!ws(&session).placement().contains(SectionKey::Summary));
        assert!(ws(&session).placement().is_consistent_with(ws(&session).document()));
    }

    #[test]
    fn test_contact_edit_bumps_revision() {
        let mut session = make_session();
        session.set_contact_field(ContactField::Phone, "555".into()).unwrap();
        assert_eq!(ws(&session).document().contact_info.phone, "555");
        assert_eq!(ws(&session).revision(), 1);
    }

    #[test]
    fn test_replace_section_adds_and_prunes_keys() {
        let mut session = make_session();
        session
            .replace_section(SectionValue::Languages(vec!["English".into()]))
            .unwrap();
        assert_eq!(
            ws(&session).placement().pages()[0].last(),
            Some(&SectionKey::Languages)
        );

        session.replace_section(SectionValue::Skills(vec![])).unwrap();
        assert!(!ws(&session).placement().contains(SectionKey::Skills));
    }

    #[test]
    fn test_section_value_wire_format() {
        let value: SectionValue =
            serde_json::from_str(r#"{"section": "extraCourses", "value": [{"name": "Rust 101"}]}"#).unwrap();
        assert_eq!(value.key(), SectionKey::ExtraCourses);
    }

    #[test]
    fn test_set_record_field() {
        let mut session = make_session();
        session
            .set_record_field(SectionKey::Education, 0, "degree", "MSc".into())
            .unwrap();
        assert_eq!(ws(&session).document().education[0].degree, "MSc");
    }

    #[test]
    fn test_invalid_record_edits_leave_state_unchanged() {
        let mut session = make_session();
        let before = ws(&session).clone();

        let err = session
            .set_record_field(SectionKey::Experience, 5, "role", "x".into())
            .unwrap_err();
        assert!(matches!(err, SessionError::IndexOutOfRange { index: 5, .. }));

        let err = session
            .set_record_field(SectionKey::Experience, 0, "salary", "x".into())
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownField { .. }));

        let err = session
            .set_record_field(SectionKey::Skills, 0, "name", "x".into())
            .unwrap_err();
        assert!(matches!(err, SessionError::NotARecordSection(SectionKey::Skills)));

        assert_eq!(ws(&session).document(), before.document());
        assert_eq!(ws(&session).revision(), before.revision());
    }

    #[test]
    fn test_set_bullet() {
        let mut session = make_session();
        session
            .set_bullet(SectionKey::Experience, 0, 1, "Cut costs by 30%".into())
            .unwrap();
        assert_eq!(ws(&session).document().experience[0].bullets[1], "Cut costs by 30%");

        let err = session
            .set_bullet(SectionKey::Experience, 0, 9, "x".into())
            .unwrap_err();
        assert!(matches!(err, SessionError::BulletOutOfRange { bullet: 9, .. }));

        let err = session
            .set_bullet(SectionKey::Education, 0, 0, "x".into())
            .unwrap_err();
        assert!(matches!(err, SessionError::NoBullets(SectionKey::Education)));
    }

    // ── placement and revert ────────────────────────────────────────────────

    #[test]
    fn test_delete_then_revert_restores_placement() {
        let mut session = make_session();
        let original = ws(&session).placement().clone();
        assert_eq!(session.delete_section(0, 1).unwrap(), Some(SectionKey::Skills));
        assert!(session.move_section_to_page(0, 0, 2).unwrap());
        session.revert().unwrap();
        assert_eq!(ws(&session).placement(), &original);
    }

    #[test]
    fn test_revert_restores_document_and_changes_epoch() {
        let mut session = make_session();
        let epoch = ws(&session).epoch();
        session.set_summary("changed".into()).unwrap();
        session.revert().unwrap();
        assert_eq!(ws(&session).document(), &make_response().optimized_resume);
        assert_ne!(ws(&session).epoch(), epoch);
        assert_eq!(ws(&session).revision(), 0);
    }

    #[test]
    fn test_move_out_of_range_reports_no_change() {
        let mut session = make_session();
        assert!(!session.move_section(9, 0, MoveDirection::Down).unwrap());
        assert!(session.move_section(0, 0, MoveDirection::Down).unwrap());
        assert_eq!(session.delete_section(0, 40).unwrap(), None);
    }

    // ── generation ──────────────────────────────────────────────────────────

    #[test]
    fn test_second_generation_is_rejected_while_in_flight() {
        let mut session = EditSession::new(2);
        session.begin_generation().unwrap();
        assert!(matches!(
            session.begin_generation(),
            Err(SessionError::RequestInFlight("generation"))
        ));
        session.finish_generation(Ok(make_response())).unwrap();
        assert!(session.is_populated());
        session.begin_generation().unwrap();
    }

    #[test]
    fn test_failed_generation_keeps_previous_workspace() {
        let mut session = make_session();
        let epoch = ws(&session).epoch();
        session.begin_generation().unwrap();
        let err = session.finish_generation(Err("boom".into())).unwrap_err();
        assert!(matches!(err, SessionError::AiFailed(ref m) if m == "boom"));
        assert_eq!(session.last_error(), Some("boom"));
        assert_eq!(ws(&session).epoch(), epoch);
    }

    // ── apply suggestion ────────────────────────────────────────────────────

    #[test]
    fn test_apply_suggestion_replaces_document() {
        let mut session = make_session();
        let job = session.begin_suggestion(1).unwrap();
        assert_eq!(job.suggestion, "Add projects");

        let mut revised = job.document.clone();
        revised.projects = vec![Project {
            name: "Optimizer".into(),
            bullets: vec!["Wrote a paginator".into()],
        }];
        session.finish_suggestion(job.ticket, Ok(revised)).unwrap();

        let ws = ws(&session);
        assert_eq!(ws.document().projects.len(), 1);
        assert!(ws.placement().contains(SectionKey::Projects));
        assert!(ws.applied_suggestions().contains(&1));
        assert_eq!(ws.revision(), 1);
    }

    #[test]
    fn test_applied_suggestion_cannot_be_reapplied() {
        let mut session = make_session();
        let job = session.begin_suggestion(0).unwrap();
        let doc = job.document.clone();
        session.finish_suggestion(job.ticket, Ok(doc)).unwrap();
        assert!(matches!(
            session.begin_suggestion(0),
            Err(SessionError::SuggestionAlreadyApplied(0))
        ));
    }

    #[test]
    fn test_suggestion_index_out_of_range() {
        let mut session = make_session();
        assert!(matches!(
            session.begin_suggestion(3),
            Err(SessionError::SuggestionOutOfRange(3))
        ));
    }

    #[test]
    fn test_one_suggestion_in_flight_at_a_time() {
        let mut session = make_session();
        let _job = session.begin_suggestion(0).unwrap();
        assert!(matches!(
            session.begin_suggestion(1),
            Err(SessionError::RequestInFlight(_))
        ));
    }

    #[test]
    fn test_response_after_edit_is_stale() {
        let mut session = make_session();
        let job = session.begin_suggestion(0).unwrap();
        session.set_summary("edited meanwhile".into()).unwrap();

        let mut revised = job.document.clone();
        revised.summary = "AI version".into();
        let err = session.finish_suggestion(job.ticket, Ok(revised)).unwrap_err();
        assert!(matches!(err, SessionError::Stale));
        assert_eq!(ws(&session).document().summary, "edited meanwhile");
        assert!(ws(&session).applied_suggestions().is_empty());

        // The slot is free again.
        session.begin_suggestion(0).unwrap();
    }

    #[test]
    fn test_response_after_revert_is_stale() {
        let mut session = make_session();
        let job = session.begin_suggestion(2).unwrap();
        session.revert().unwrap();
        let doc = job.document.clone();
        assert!(matches!(
            session.finish_suggestion(job.ticket, Ok(doc)),
            Err(SessionError::Stale)
        ));
    }

    #[test]
    fn test_failed_suggestion_records_error_until_revert() {
        let mut session = make_session();
        let job = session.begin_suggestion(0).unwrap();
        let err = session
            .finish_suggestion(job.ticket, Err("AI unavailable".into()))
            .unwrap_err();
        assert!(matches!(err, SessionError::AiFailed(_)));
        assert_eq!(
            ws(&session).suggestion_errors().get(&0).map(String::as_str),
            Some("AI unavailable")
        );
        assert_eq!(ws(&session).revision(), 0);

        session.revert().unwrap();
        assert!(ws(&session).suggestion_errors().is_empty());
    }

    // ── export ──────────────────────────────────────────────────────────────

    #[test]
    fn test_paint_uses_profile_image_flag() {
        let mut session = make_session();
        session.set_profile_image(Some(ProfileImage {
            width: 1,
            height: 1,
            rgb: vec![0, 0, 0],
        }));
        let program = session.paint(&StaticMeasurer, &default_page_config()).unwrap();
        assert!(matches!(program.pages[0].ops[0], crate::layout::DrawOp::Image { .. }));
        assert_eq!(program.file_name, "Jane_Doe_Resume.pdf");
    }

    #[test]
    fn test_session_serializes_without_image_bytes() {
        let mut session = make_session();
        session.set_profile_image(Some(ProfileImage {
            width: 1,
            height: 1,
            rgb: vec![1, 2, 3],
        }));
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("profileImage").is_none());
        assert_eq!(value["workspace"]["document"]["contactInfo"]["name"], "Jane Doe");
        assert_eq!(value["generation"], "idle");
    }
}
