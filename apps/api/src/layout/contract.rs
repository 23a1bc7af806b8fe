//! Layout Contract: the one projection of a [`ResumeRecord`] that both the
//! live preview and the print renderer draw from.
//!
//! # Contract rules
//! - Header: full name (or placeholder), then each non-empty contact line in
//!   email → phone → location order.
//! - Sections in fixed order: Summary, Experience, Education, Skills. A
//!   section exists only when its data is non-empty.
//! - Entries keep record order; blank fields become placeholder text.
//! - With no name, experience, education or skills the layout carries the
//!   empty-state flag. The flag never removes a section: a summary-only
//!   record keeps its Summary section alongside the placeholder.

use serde::Serialize;

use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalField, ResumeRecord};

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const POSITION_PLACEHOLDER: &str = "Position Title";
pub const COMPANY_PLACEHOLDER: &str = "Company Name";
pub const DURATION_PLACEHOLDER: &str = "Duration";
pub const DEGREE_PLACEHOLDER: &str = "Degree";
pub const SCHOOL_PLACEHOLDER: &str = "School Name";
pub const YEAR_PLACEHOLDER: &str = "Year";

pub const EMPTY_STATE_TITLE: &str = "Start filling out the form to see your resume preview";
pub const EMPTY_STATE_HINT: &str = "What you see here is exactly what you'll get in your PDF";

// ────────────────────────────────────────────────────────────────────────────
// Layout types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Summary => "Professional Summary",
            SectionKind::Experience => "Work Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub name: String,
    pub contact_lines: Vec<String>,
}

/// One experience or education row, placeholders already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Position or degree.
    pub heading: String,
    /// Company or school; drawn in the template accent colour.
    pub subheading: String,
    /// Duration or year; drawn in the right-aligned pill.
    pub badge: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionView {
    Summary(String),
    Experience(Vec<EntryView>),
    Education(Vec<EntryView>),
    Skills(Vec<String>),
}

impl SectionView {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionView::Summary(_) => SectionKind::Summary,
            SectionView::Experience(_) => SectionKind::Experience,
            SectionView::Education(_) => SectionKind::Education,
            SectionView::Skills(_) => SectionKind::Skills,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeLayout {
    pub header: HeaderView,
    pub sections: Vec<SectionView>,
    /// Show the "start filling out the form" placeholder. Print ignores it.
    pub empty_state: bool,
}

impl ResumeLayout {
    pub fn section_kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(SectionView::kind).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projection
// ────────────────────────────────────────────────────────────────────────────

pub fn build_layout(record: &ResumeRecord) -> ResumeLayout {
    let info = &record.personal_info;

    let header = HeaderView {
        name: or_placeholder(&info.full_name, NAME_PLACEHOLDER),
        contact_lines: [PersonalField::Email, PersonalField::Phone, PersonalField::Location]
            .into_iter()
            .map(|field| info.get(field))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let mut sections = Vec::with_capacity(4);
    if !info.summary.is_empty() {
        sections.push(SectionView::Summary(info.summary.clone()));
    }
    if !record.experience.is_empty() {
        sections.push(SectionView::Experience(
            record.experience.iter().map(experience_view).collect(),
        ));
    }
    if !record.education.is_empty() {
        sections.push(SectionView::Education(
            record.education.iter().map(education_view).collect(),
        ));
    }
    if !record.skills.is_empty() {
        sections.push(SectionView::Skills(record.skills.clone()));
    }

    ResumeLayout {
        header,
        sections,
        empty_state: record.is_empty(),
    }
}

fn experience_view(entry: &ExperienceEntry) -> EntryView {
    EntryView {
        heading: or_placeholder(&entry.position, POSITION_PLACEHOLDER),
        subheading: or_placeholder(&entry.company, COMPANY_PLACEHOLDER),
        badge: or_placeholder(&entry.duration, DURATION_PLACEHOLDER),
        detail: (!entry.description.is_empty()).then(|| entry.description.clone()),
    }
}

fn education_view(entry: &EducationEntry) -> EntryView {
    EntryView {
        heading: or_placeholder(&entry.degree, DEGREE_PLACEHOLDER),
        subheading: or_placeholder(&entry.school, SCHOOL_PLACEHOLDER),
        badge: or_placeholder(&entry.year, YEAR_PLACEHOLDER),
        detail: None,
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
