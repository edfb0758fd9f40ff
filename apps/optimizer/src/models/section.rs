//! Section keys and the closed set of section shapes the renderer understands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a placeable resume section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
    Certifications,
    ExtraCourses,
    Languages,
}

impl SectionKey {
    /// Default top-to-bottom order of a freshly generated resume.
    pub const CANONICAL: [SectionKey; 8] = [
        SectionKey::Summary,
        SectionKey::Skills,
        SectionKey::Experience,
        SectionKey::Projects,
        SectionKey::Education,
        SectionKey::Certifications,
        SectionKey::ExtraCourses,
        SectionKey::Languages,
    ];

    /// Heading printed above the section body.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKey::Summary => "Professional Summary",
            SectionKey::Skills => "Skills",
            SectionKey::Experience => "Experience",
            SectionKey::Projects => "Projects",
            SectionKey::Education => "Education",
            SectionKey::Certifications => "Certifications",
            SectionKey::ExtraCourses => "Extra Courses",
            SectionKey::Languages => "Languages",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Skills => "skills",
            SectionKey::Experience => "experience",
            SectionKey::Projects => "projects",
            SectionKey::Education => "education",
            SectionKey::Certifications => "certifications",
            SectionKey::ExtraCourses => "extraCourses",
            SectionKey::Languages => "languages",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `experience` or `projects` entry as the renderer sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem<'a> {
    pub heading: &'a str,
    pub subheading: Option<&'a str>,
    pub dates: Option<&'a str>,
    pub bullets: &'a [String],
}

/// Fixed two-line entry: title with a right-aligned date, subtitle below.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedPair<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub subtitle: &'a str,
}

/// Body of a section, one variant per renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent<'a> {
    Text(&'a str),
    List(&'a [String]),
    WorkItems(Vec<WorkItem<'a>>),
    DatedPairs(Vec<DatedPair<'a>>),
}

impl SectionContent<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            SectionContent::Text(text) => text.trim().is_empty(),
            SectionContent::List(items) => items.is_empty(),
            SectionContent::WorkItems(items) => items.is_empty(),
            SectionContent::DatedPairs(pairs) => pairs.is_empty(),
        }
    }
}
