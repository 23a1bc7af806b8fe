use serde::{Deserialize, Serialize};

/// Contact details and summary shown in the resume header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

impl PersonalInfo {
    pub fn get(&self, field: PersonalField) -> &str {
        match field {
            PersonalField::FullName => &self.full_name,
            PersonalField::Email => &self.email,
            PersonalField::Phone => &self.phone,
            PersonalField::Location => &self.location,
            PersonalField::Summary => &self.summary,
        }
    }

    fn slot(&mut self, field: PersonalField) -> &mut String {
        match field {
            PersonalField::FullName => &mut self.full_name,
            PersonalField::Email => &mut self.email,
            PersonalField::Phone => &mut self.phone,
            PersonalField::Location => &mut self.location,
            PersonalField::Summary => &mut self.summary,
        }
    }

    /// Returns a copy of `self` with one field replaced.
    pub fn with(&self, field: PersonalField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot(field) = value.into();
        next
    }
}

/// One work-experience entry. Missing sub-fields deserialize as empty strings,
/// so an entry is never partially constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
}

impl ExperienceEntry {
    pub fn with(&self, field: ExperienceField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            ExperienceField::Company => &mut next.company,
            ExperienceField::Position => &mut next.position,
            ExperienceField::Duration => &mut next.duration,
            ExperienceField::Description => &mut next.description,
        };
        *slot = value.into();
        next
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub year: String,
}

impl EducationEntry {
    pub fn with(&self, field: EducationField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            EducationField::School => &mut next.school,
            EducationField::Degree => &mut next.degree,
            EducationField::Year => &mut next.year,
        };
        *slot = value.into();
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersonalField {
    FullName,
    Email,
    Phone,
    Location,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceField {
    Company,
    Position,
    Duration,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationField {
    School,
    Degree,
    Year,
}

/// All resume content for one builder session. Held in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
}

impl ResumeRecord {
    /// True when there is no name, experience, education or skills.
    /// Contact details and the summary alone do not make a resume.
    pub fn is_empty(&self) -> bool {
        self.personal_info.full_name.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
    }

    /// Top-level merge: every section present in `patch` replaces the current
    /// section wholesale. Sections absent from the patch are untouched.
    pub fn merge(&mut self, patch: ResumePatch) {
        if let Some(personal_info) = patch.personal_info {
            self.personal_info = personal_info;
        }
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(education) = patch.education {
            self.education = education;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
    }
}

/// A partial record. `None` means "leave this section alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}
