use serde::{Deserialize, Serialize};

use crate::models::section::{DatedPair, SectionContent, SectionKey, WorkItem};

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// Personal details. Doubles as the `contactInfo` block of a resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

impl ContactInfo {
    /// Email, phone and LinkedIn joined with `separator`, skipping empty fields.
    pub fn contact_line(&self, separator: &str) -> String {
        [&self.email, &self.phone, &self.linkedin]
            .into_iter()
            .map(|field| field.trim())
            .filter(|field| !field.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub dates: String,
    #[serde(rename = "description")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub name: String,
    #[serde(rename = "description")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub dates: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub authority: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraCourse {
    pub name: String,
    pub institution: String,
    pub dates: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// The structured resume returned by the AI and edited by the user.
///
/// Every section defaults to empty when missing from a payload, so a provider
/// that omits `projects` (or any other list) still yields a valid document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub contact_info: ContactInfo,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub extra_courses: Vec<ExtraCourse>,
    pub languages: Vec<String>,
}

impl ResumeDocument {
    /// Borrowed, render-ready view of one section.
    pub fn section(&self, key: SectionKey) -> SectionContent<'_> {
        match key {
            SectionKey::Summary => SectionContent::Text(&self.summary),
            SectionKey::Skills => SectionContent::List(&self.skills),
            SectionKey::Languages => SectionContent::List(&self.languages),
            SectionKey::Experience => SectionContent::WorkItems(
                self.experience
                    .iter()
                    .map(|e| WorkItem {
                        heading: &e.role,
                        subheading: non_empty(&e.company),
                        dates: non_empty(&e.dates),
                        bullets: &e.bullets,
                    })
                    .collect(),
            ),
            SectionKey::Projects => SectionContent::WorkItems(
                self.projects
                    .iter()
                    .map(|p| WorkItem {
                        heading: &p.name,
                        subheading: None,
                        dates: None,
                        bullets: &p.bullets,
                    })
                    .collect(),
            ),
            SectionKey::Education => SectionContent::DatedPairs(
                self.education
                    .iter()
                    .map(|e| DatedPair {
                        title: &e.institution,
                        date: &e.dates,
                        subtitle: &e.degree,
                    })
                    .collect(),
            ),
            SectionKey::Certifications => SectionContent::DatedPairs(
                self.certifications
                    .iter()
                    .map(|c| DatedPair {
                        title: &c.name,
                        date: &c.date,
                        subtitle: &c.authority,
                    })
                    .collect(),
            ),
            SectionKey::ExtraCourses => SectionContent::DatedPairs(
                self.extra_courses
                    .iter()
                    .map(|c| DatedPair {
                        title: &c.name,
                        date: &c.dates,
                        subtitle: &c.institution,
                    })
                    .collect(),
            ),
        }
    }

    /// A section is present when its scalar text is non-blank or its list is non-empty.
    pub fn is_present(&self, key: SectionKey) -> bool {
        match key {
            SectionKey::Summary => !self.summary.trim().is_empty(),
            SectionKey::Skills => !self.skills.is_empty(),
            SectionKey::Languages => !self.languages.is_empty(),
            SectionKey::Experience => !self.experience.is_empty(),
            SectionKey::Projects => !self.projects.is_empty(),
            SectionKey::Education => !self.education.is_empty(),
            SectionKey::Certifications => !self.certifications.is_empty(),
            SectionKey::ExtraCourses => !self.extra_courses.is_empty(),
        }
    }

    /// Present sections in canonical order.
    pub fn present_sections(&self) -> Vec<SectionKey> {
        SectionKey::CANONICAL
            .into_iter()
            .filter(|key| self.is_present(*key))
            .collect()
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// The full generation response. Retained unchanged as the session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub feedback: Feedback,
    pub optimized_resume: ResumeDocument,
}
