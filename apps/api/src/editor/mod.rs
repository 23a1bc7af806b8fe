//! Form Editor: every edit is expressed as a [`ResumePatch`] and funnelled
//! through [`FormEditor::apply`], the single mutation entry point.
//!
//! No validation happens here. Any string is accepted for any field; missing
//! data is a presentation concern handled by the renderers.

pub mod handlers;

use tracing::debug;

use crate::models::resume::{
    EducationEntry, EducationField, ExperienceEntry, ExperienceField, PersonalField,
    ResumePatch, ResumeRecord,
};

/// Separator used when the skills list is shown back as raw text.
const SKILLS_JOIN: &str = ", ";

/// Read-write view over a record, scoped to a single edit.
pub struct FormEditor<'a> {
    record: &'a mut ResumeRecord,
}

impl<'a> FormEditor<'a> {
    pub fn new(record: &'a mut ResumeRecord) -> Self {
        Self { record }
    }

    /// Merges a partial record at the top level (section-level replace).
    pub fn apply(&mut self, patch: ResumePatch) {
        self.record.merge(patch);
    }

    pub fn update_field(&mut self, field: PersonalField, value: impl Into<String>) {
        let personal_info = self.record.personal_info.with(field, value);
        self.apply(ResumePatch {
            personal_info: Some(personal_info),
            ..Default::default()
        });
    }

    pub fn add_experience_entry(&mut self) {
        let mut experience = self.record.experience.clone();
        experience.push(ExperienceEntry::default());
        self.apply(ResumePatch {
            experience: Some(experience),
            ..Default::default()
        });
    }

    /// Replaces one field of the entry at `index`. Out-of-range indices are ignored.
    pub fn update_experience_entry(
        &mut self,
        index: usize,
        field: ExperienceField,
        value: impl Into<String>,
    ) {
        let Some(current) = self.record.experience.get(index) else {
            debug!(index, "Ignoring experience update for missing entry");
            return;
        };
        let mut experience = self.record.experience.clone();
        experience[index] = current.with(field, value);
        self.apply(ResumePatch {
            experience: Some(experience),
            ..Default::default()
        });
    }

    pub fn add_education_entry(&mut self) {
        let mut education = self.record.education.clone();
        education.push(EducationEntry::default());
        self.apply(ResumePatch {
            education: Some(education),
            ..Default::default()
        });
    }

    /// Replaces one field of the entry at `index`. Out-of-range indices are ignored.
    pub fn update_education_entry(
        &mut self,
        index: usize,
        field: EducationField,
        value: impl Into<String>,
    ) {
        let Some(current) = self.record.education.get(index) else {
            debug!(index, "Ignoring education update for missing entry");
            return;
        };
        let mut education = self.record.education.clone();
        education[index] = current.with(field, value);
        self.apply(ResumePatch {
            education: Some(education),
            ..Default::default()
        });
    }

    pub fn set_skills_from_text(&mut self, text: &str) {
        self.apply(ResumePatch {
            skills: Some(parse_skills(text)),
            ..Default::default()
        });
    }
}

/// Splits comma-separated skills, trimming each piece and dropping empties.
pub fn parse_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// The raw text the skills field displays for the current list.
pub fn skills_text(record: &ResumeRecord) -> String {
    record.skills.join(SKILLS_JOIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills_trims_and_drops_empty() {
        assert_eq!(
            parse_skills("JavaScript, React,  Node.js ,"),
            vec!["JavaScript", "React", "Node.js"]
        );
    }

    #[test]
    fn test_parse_skills_empty_input() {
        assert!(parse_skills("").is_empty());
        assert!(parse_skills(" , ,, ").is_empty());
    }

    #[test]
    fn test_set_skills_is_idempotent() {
        let mut record = ResumeRecord::default();
        let text = "Rust , Go,,SQL ";
        FormEditor::new(&mut record).set_skills_from_text(text);
        let once = record.skills.clone();
        FormEditor::new(&mut record).set_skills_from_text(text);
        assert_eq!(record.skills, once);
    }

    #[test]
    fn test_skills_text_round_trips() {
        let mut record = ResumeRecord::default();
        FormEditor::new(&mut record).set_skills_from_text("Rust,Go");
        let text = skills_text(&record);
        assert_eq!(text, "Rust, Go");
        FormEditor::new(&mut record).set_skills_from_text(&text);
        assert_eq!(record.skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_add_then_update_experience() {
        let mut record = ResumeRecord::default();
        let mut editor = FormEditor::new(&mut record);
        editor.add_experience_entry();
        editor.update_experience_entry(0, ExperienceField::Company, "Acme");
        assert_eq!(
            record.experience,
            vec![ExperienceEntry {
                company: "Acme".to_string(),
                position: String::new(),
                duration: String::new(),
                description: String::new(),
            }]
        );
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let mut record = ResumeRecord::default();
        let mut editor = FormEditor::new(&mut record);
        editor.add_education_entry();
        editor.update_education_entry(3, EducationField::School, "MIT");
        editor.update_experience_entry(0, ExperienceField::Company, "Acme");
        assert_eq!(record.education, vec![EducationEntry::default()]);
        assert!(record.experience.is_empty());
    }

    #[test]
    fn test_add_does_not_validate_prior_entries() {
        let mut record = ResumeRecord::default();
        let mut editor = FormEditor::new(&mut record);
        editor.add_experience_entry();
        editor.add_experience_entry();
        assert_eq!(record.experience.len(), 2);
    }

    #[test]
    fn test_update_field_keeps_other_personal_fields() {
        let mut record = ResumeRecord::default();
        let mut editor = FormEditor::new(&mut record);
        editor.update_field(PersonalField::FullName, "Jane Doe");
        editor.update_field(PersonalField::Email, "not-an-email");
        assert_eq!(record.personal_info.full_name, "Jane Doe");
        assert_eq!(record.personal_info.email, "not-an-email");
    }

    #[test]
    fn test_update_entry_only_touches_target_index() {
        let mut record = ResumeRecord::default();
        let mut editor = FormEditor::new(&mut record);
        editor.add_education_entry();
        editor.add_education_entry();
        editor.update_education_entry(1, EducationField::Degree, "BSc");
        assert_eq!(record.education[0], EducationEntry::default());
        assert_eq!(record.education[1].degree, "BSc");
    }
}
