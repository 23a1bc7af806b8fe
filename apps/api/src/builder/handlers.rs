//! Axum route handlers for builder sessions: lifecycle, template selection,
//! rendering, and export.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::builder::SessionView;
use crate::errors::AppError;
use crate::export::notify::Notification;
use crate::export::{export_resume, ExportArtifact};
use crate::layout::contract::ResumeLayout;
use crate::layout::print::PrintDocument;
use crate::state::AppState;
use crate::templates::TemplateId;

#[derive(Debug, Default, Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub template: Option<TemplateId>,
}

#[derive(Debug, Deserialize)]
pub struct SelectTemplateRequest {
    pub template: TemplateId,
}

/// POST /api/v1/builder
///
/// Opens an empty builder session. The body is optional.
pub async fn handle_open_session(
    State(state): State<AppState>,
    body: Option<Json<OpenSessionRequest>>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let template = body
        .and_then(|Json(req)| req.template)
        .unwrap_or(state.config.default_template);

    let view = state.sessions.open(template).await.ok_or_else(|| {
        AppError::Capacity(format!(
            "Session limit of {} reached",
            state.config.max_sessions
        ))
    })?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/builder/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    read(&state, id, |s| s.view()).await.map(Json)
}

/// DELETE /api/v1/builder/:id
///
/// Discards the session and everything entered in it.
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::session_not_found(id))
    }
}

/// PUT /api/v1/builder/:id/template
///
/// Unknown template ids select `modern`.
pub async fn handle_select_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectTemplateRequest>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .with_session_mut(id, |s| {
            s.select_template(req.template);
            s.view()
        })
        .await
        .map(Json)
        .ok_or_else(|| AppError::session_not_found(id))
}

/// GET /api/v1/builder/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    read(&state, id, |s| Html(s.preview().into_string())).await
}

/// GET /api/v1/builder/:id/layout
///
/// The renderer-neutral layout both the preview and the print output draw from.
pub async fn handle_layout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeLayout>, AppError> {
    read(&state, id, |s| s.layout()).await.map(Json)
}

/// GET /api/v1/builder/:id/print
pub async fn handle_print(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PrintDocument>, AppError> {
    read(&state, id, |s| s.print_document()).await.map(Json)
}

/// POST /api/v1/builder/:id/export
///
/// Renders the PDF and returns it as a download. One export per session at a
/// time; a second request while one is running gets 409.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = read(&state, id, |s| s.begin_export())
        .await?
        .ok_or_else(|| {
            AppError::Conflict("An export is already in progress for this session".to_string())
        })?;

    let artifact = export_resume(
        &ticket.record,
        ticket.template,
        state.engine.as_ref(),
        ticket.notifications.as_ref(),
    )
    .await?;

    Ok(download(artifact))
}

/// GET /api/v1/builder/:id/notifications
pub async fn handle_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, AppError> {
    read(&state, id, |s| s.notifications().snapshot())
        .await
        .map(Json)
}

async fn read<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&crate::builder::BuilderSession) -> R,
) -> Result<R, AppError> {
    state
        .sessions
        .with_session(id, f)
        .await
        .ok_or_else(|| AppError::session_not_found(id))
}

fn download(artifact: ExportArtifact) -> Response {
    (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// `attachment` disposition with an ASCII fallback name and the exact name
/// percent-encoded in `filename*`.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
