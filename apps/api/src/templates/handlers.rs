use axum::Json;

use crate::templates::{catalog, TemplateInfo};

/// GET /api/v1/templates
///
/// The template picker catalog, in display order, with resolved colours.
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(catalog())
}
