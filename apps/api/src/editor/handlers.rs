//! Axum route handlers for the Form Editor. Each handler performs exactly one
//! editor operation and answers with the updated session.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::builder::SessionView;
use crate::errors::AppError;
use crate::models::resume::{EducationField, ExperienceField, PersonalField, ResumePatch};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PersonalFieldUpdate {
    pub field: PersonalField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceFieldUpdate {
    pub field: ExperienceField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct EducationFieldUpdate {
    pub field: EducationField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillsText {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/builder/:id
///
/// Applies a partial record; each present section replaces the current one.
pub async fn handle_apply_patch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| s.edit(|e| e.apply(patch))).await
}

/// PATCH /api/v1/builder/:id/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersonalFieldUpdate>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| s.edit(|e| e.update_field(req.field, req.value))).await
}

/// POST /api/v1/builder/:id/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| s.edit(|e| e.add_experience_entry())).await
}

/// PATCH /api/v1/builder/:id/experience/:index
///
/// An index past the end is ignored and the unchanged session is returned.
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<ExperienceFieldUpdate>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| {
        s.edit(|e| e.update_experience_entry(index, req.field, req.value))
    })
    .await
}

/// POST /api/v1/builder/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| s.edit(|e| e.add_education_entry())).await
}

/// PATCH /api/v1/builder/:id/education/:index
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<EducationFieldUpdate>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| {
        s.edit(|e| e.update_education_entry(index, req.field, req.value))
    })
    .await
}

/// PUT /api/v1/builder/:id/skills
pub async fn handle_set_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillsText>,
) -> Result<Json<SessionView>, AppError> {
    edit(&state, id, |s| s.edit(|e| e.set_skills_from_text(&req.text))).await
}

async fn edit(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut crate::builder::BuilderSession),
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .with_session_mut(id, |session| {
            f(session);
            session.view()
        })
        .await
        .map(Json)
        .ok_or_else(|| AppError::session_not_found(id))
}
