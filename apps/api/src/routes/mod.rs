pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::builder::handlers as builder;
use crate::editor::handlers as editor;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(templates::handle_list_templates))
        // Session lifecycle
        .route("/api/v1/builder", post(builder::handle_open_session))
        .route(
            "/api/v1/builder/:id",
            get(builder::handle_get_session)
                .patch(editor::handle_apply_patch)
                .delete(builder::handle_close_session),
        )
        // Form editing
        .route(
            "/api/v1/builder/:id/personal",
            patch(editor::handle_update_personal),
        )
        .route(
            "/api/v1/builder/:id/experience",
            post(editor::handle_add_experience),
        )
        .route(
            "/api/v1/builder/:id/experience/:index",
            patch(editor::handle_update_experience),
        )
        .route(
            "/api/v1/builder/:id/education",
            post(editor::handle_add_education),
        )
        .route(
            "/api/v1/builder/:id/education/:index",
            patch(editor::handle_update_education),
        )
        .route("/api/v1/builder/:id/skills", put(editor::handle_set_skills))
        .route(
            "/api/v1/builder/:id/template",
            put(builder::handle_select_template),
        )
        // Rendering and export
        .route("/api/v1/builder/:id/preview", get(builder::handle_preview))
        .route("/api/v1/builder/:id/layout", get(builder::handle_layout))
        .route("/api/v1/builder/:id/print", get(builder::handle_print))
        .route("/api/v1/builder/:id/export", post(builder::handle_export))
        .route(
            "/api/v1/builder/:id/notifications",
            get(builder::handle_notifications),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::export::engine::DocumentEngine;
    use crate::export::test_support::{FailingEngine, StaticEngine};

    fn app_with(engine: Arc<dyn DocumentEngine>) -> (Router, AppState) {
        let state = AppState::new(Config::default(), engine);
        (build_router(state.clone()), state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn open(app: &Router) -> String {
        let response = send(app, Method::POST, "/api/v1/builder", None).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health_reports_sessions() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        open(&app).await;
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn test_templates_catalog() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let body = body_json(send(&app, Method::GET, "/api/v1/templates", None).await).await;
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["modern", "minimalist", "elegant", "creative"]);
        assert_eq!(body[0]["style"]["header_background"], "#2563eb");
    }

    #[tokio::test]
    async fn test_new_session_is_empty_with_default_template() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let body = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}"), None).await).await;
        assert_eq!(body["template"], "modern");
        assert_eq!(body["record"]["personalInfo"]["fullName"], "");
        assert_eq!(body["record"]["experience"], json!([]));

        let preview = send(&app, Method::GET, &format!("/api/v1/builder/{id}/preview"), None).await;
        let html = String::from_utf8(body_bytes(preview).await).unwrap();
        assert!(html.contains("data-empty-state"));
    }

    #[tokio::test]
    async fn test_add_then_update_experience() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;

        let added = send(&app, Method::POST, &format!("/api/v1/builder/{id}/experience"), None).await;
        let body = body_json(added).await;
        assert_eq!(body["record"]["experience"].as_array().unwrap().len(), 1);
        assert_eq!(body["record"]["experience"][0]["company"], "");

        let updated = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/builder/{id}/experience/0"),
            Some(json!({ "field": "company", "value": "Acme" })),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::OK);
        let body = body_json(updated).await;
        assert_eq!(body["record"]["experience"][0]["company"], "Acme");
        assert_eq!(body["record"]["experience"][0]["position"], "");
    }

    #[tokio::test]
    async fn test_out_of_range_update_is_ignored() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let response = send(
            &app,
            Method::PATCH,
            &format!("/api/v1/builder/{id}/education/3"),
            Some(json!({ "field": "school", "value": "MIT" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["record"]["education"], json!([]));
    }

    #[tokio::test]
    async fn test_skills_text_drives_preview_badges() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let response = send(
            &app,
            Method::PUT,
            &format!("/api/v1/builder/{id}/skills"),
            Some(json!({ "text": "Rust, , Go ,SQL" })),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["record"]["skills"], json!(["Rust", "Go", "SQL"]));
        assert_eq!(body["skills_text"], "Rust, Go, SQL");

        let preview = send(&app, Method::GET, &format!("/api/v1/builder/{id}/preview"), None).await;
        let html = String::from_utf8(body_bytes(preview).await).unwrap();
        assert_eq!(html.matches("data-badge").count(), 3);
        assert!(!html.contains("data-empty-state"));
    }

    #[tokio::test]
    async fn test_unknown_template_selects_modern() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let uri = format!("/api/v1/builder/{id}/template");

        let body = body_json(send(&app, Method::PUT, &uri, Some(json!({ "template": "elegant" }))).await).await;
        assert_eq!(body["template"], "elegant");

        let body = body_json(send(&app, Method::PUT, &uri, Some(json!({ "template": "neon" }))).await).await;
        assert_eq!(body["template"], "modern");
    }

    #[tokio::test]
    async fn test_layout_and_print_agree_on_sections() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/builder/{id}"),
            Some(json!({
                "personalInfo": { "fullName": "Jane Doe", "summary": "Builder of things" },
                "skills": ["Rust"]
            })),
        )
        .await;

        let layout = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}/layout"), None).await).await;
        let print = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}/print"), None).await).await;
        assert_eq!(layout["header"]["name"], "Jane Doe");
        assert_eq!(layout["empty_state"], false);

        let layout_kinds: Vec<&str> = layout["sections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["kind"].as_str().unwrap())
            .collect();
        let print_kinds: Vec<&str> = print["pages"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|page| page["sections"].as_array().unwrap())
            .filter(|s| s["role"]["role"] == "content")
            .map(|s| s["role"]["kind"].as_str().unwrap())
            .collect();
        assert_eq!(layout_kinds, ["summary", "skills"]);
        assert_eq!(print_kinds, layout_kinds);
    }

    #[tokio::test]
    async fn test_contact_only_session_previews_empty_state() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/builder/{id}/personal"),
            Some(json!({ "field": "email", "value": "jane@example.com" })),
        )
        .await;

        let preview = send(&app, Method::GET, &format!("/api/v1/builder/{id}/preview"), None).await;
        let html = String::from_utf8(body_bytes(preview).await).unwrap();
        assert_eq!(html.matches("data-empty-state").count(), 1);
        assert!(html.contains("jane@example.com"));
    }

    #[tokio::test]
    async fn test_export_returns_named_attachment() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        send(
            &app,
            Method::PATCH,
            &format!("/api/v1/builder/{id}/personal"),
            Some(json!({ "field": "fullName", "value": "Jane Doe" })),
        )
        .await;

        let response = send(&app, Method::POST, &format!("/api/v1/builder/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("filename=\"Jane Doe_CV.pdf\""));
        assert!(body_bytes(response).await.starts_with(b"%PDF"));

        let notes = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}/notifications"), None).await).await;
        assert_eq!(notes.as_array().unwrap().len(), 1);
        assert_eq!(notes[0]["id"], "pdf-download");
        assert_eq!(notes[0]["state"], "success");
    }

    #[tokio::test]
    async fn test_failed_export_reports_error_and_keeps_record() {
        let (app, _) = app_with(Arc::new(FailingEngine));
        let id = open(&app).await;
        send(
            &app,
            Method::PUT,
            &format!("/api/v1/builder/{id}/skills"),
            Some(json!({ "text": "Rust" })),
        )
        .await;

        let response = send(&app, Method::POST, &format!("/api/v1/builder/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXPORT_FAILED");

        let notes = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}/notifications"), None).await).await;
        assert_eq!(notes[0]["state"], "error");

        let session = body_json(send(&app, Method::GET, &format!("/api/v1/builder/{id}"), None).await).await;
        assert_eq!(session["record"]["skills"], json!(["Rust"]));
        assert_eq!(session["exporting"], false);
    }

    #[tokio::test]
    async fn test_second_export_while_running_conflicts() {
        let (app, state) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let session_id: Uuid = id.parse().unwrap();

        let ticket = state
            .sessions
            .with_session(session_id, |s| s.begin_export())
            .await
            .flatten();
        assert!(ticket.is_some());

        let response = send(&app, Method::POST, &format!("/api/v1/builder/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"]["code"], "EXPORT_IN_PROGRESS");

        drop(ticket);
        let response = send(&app, Method::POST, &format!("/api/v1/builder/{id}/export"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _) = app_with(Arc::new(StaticEngine));
        let uri = format!("/api/v1/builder/{}/preview", Uuid::new_v4());
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_close_discards_session() {
        let (app, state) = app_with(Arc::new(StaticEngine));
        let id = open(&app).await;
        let uri = format!("/api/v1/builder/{id}");

        assert_eq!(send(&app, Method::DELETE, &uri, None).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(send(&app, Method::GET, &uri, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_session_capacity() {
        let config = Config {
            max_sessions: 1,
            ..Config::default()
        };
        let app = build_router(AppState::new(config, Arc::new(StaticEngine)));
        open(&app).await;
        let response = send(&app, Method::POST, "/api/v1/builder", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
