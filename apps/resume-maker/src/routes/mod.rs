pub mod document;
pub mod health;
pub mod preview;
pub mod session;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document editing
        .route("/api/document", get(document::handle_get_document))
        .route("/api/document/field", patch(document::handle_update_field))
        .route(
            "/api/document/items",
            post(document::handle_add_item).delete(document::handle_remove_item),
        )
        .route("/api/document/skills", post(document::handle_add_skill))
        .route(
            "/api/document/projects/:index/tech",
            post(document::handle_add_tech),
        )
        .route("/api/document/reset", post(document::handle_reset))
        // Editor session and publishing
        .route("/api/session", get(session::handle_get_session))
        .route("/api/session/tab", put(session::handle_set_tab))
        .route("/api/publish", post(session::handle_publish))
        // Preview and export
        .route("/api/preview", get(preview::handle_preview_layout))
        .route("/preview", get(preview::handle_preview_page))
        .route("/api/export", get(preview::handle_export))
        .route("/p/:slug", get(preview::handle_public))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tokio::sync::Notify;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::export::GreekingRasterizer;
    use crate::models::{default_document, Document};
    use crate::persistence::{MemoryStore, RemoteError, RemoteStore, SaveReceipt};
    use crate::session::Session;

    /// In-process publish API: serves one public slug and records every save.
    #[derive(Default)]
    struct FakeRemote {
        public: Option<(String, Document)>,
        reject_with: Option<String>,
        gate: Option<Arc<Notify>>,
        sent_ids: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl RemoteStore for FakeRemote {
        async fn load_remote(&self, slug: &str) -> Option<Document> {
            self.public
                .as_ref()
                .filter(|(s, _)| s == slug)
                .map(|(_, doc)| doc.clone())
        }

        async fn save_remote(
            &self,
            existing_id: Option<&str>,
            _doc: &Document,
            _title: &str,
        ) -> Result<SaveReceipt, RemoteError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.sent_ids
                .lock()
                .unwrap()
                .push(existing_id.map(String::from));
            match &self.reject_with {
                Some(message) => Err(RemoteError::Api {
                    status: 400,
                    message: message.clone(),
                }),
                None => Ok(SaveReceipt {
                    id: "42".into(),
                    slug: "abc".into(),
                }),
            }
        }
    }

    fn test_config() -> Config {
        Config {
            port: 0,
            rust_log: "debug".into(),
            store_dir: PathBuf::from("unused"),
            remote_api_url: "http://localhost:3000".into(),
            remote_timeout: Duration::from_secs(1),
            font_path: None,
        }
    }

    fn app_with(remote: Arc<FakeRemote>) -> (Router, AppState) {
        let session = Session::open(Arc::new(MemoryStore::new()));
        let state = AppState::new(session, remote, Arc::new(GreekingRasterizer), test_config());
        (build_router(state.clone()), state)
    }

    fn app() -> Router {
        app_with(Arc::new(FakeRemote::default())).0
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_update_field_and_read_back() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                "/api/document/field",
                json!({ "path": "experience.0.bullets.1", "value": "Cut deploy time in half" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = body_json(app.oneshot(get("/api/document")).await.unwrap()).await;
        assert_eq!(doc["experience"][0]["bullets"][1], "Cut deploy time in half");
        assert_eq!(doc["profile"]["name"], "Your Name");
    }

    #[tokio::test]
    async fn test_invalid_path_is_rejected_without_change() {
        let app = app();
        for path in ["profile.age", "experience.7.role", "skills.x"] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "PATCH",
                    "/api/document/field",
                    json!({ "path": path, "value": "x" }),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(body_json(response).await["error"]["code"], "INVALID_PATH");
        }
        let doc = body_json(app.oneshot(get("/api/document")).await.unwrap()).await;
        assert_eq!(doc, serde_json::to_value(default_document()).unwrap());
    }

    #[tokio::test]
    async fn test_add_and_remove_items() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/document/items",
                json!({ "list": "experience" }),
            ))
            .await
            .unwrap();
        let doc = body_json(response).await;
        assert_eq!(doc["experience"].as_array().unwrap().len(), 2);
        assert_eq!(doc["experience"][1]["bullets"], json!([""]));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/document/items",
                json!({ "list": "projects.0.tech", "item": "Redis" }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["projects"][0]["tech"][4], "Redis");

        let response = app
            .clone()
            .oneshot(json_request(
                "DELETE",
                "/api/document/items",
                json!({ "list": "experience", "index": 0 }),
            ))
            .await
            .unwrap();
        let doc = body_json(response).await;
        assert_eq!(doc["experience"].as_array().unwrap().len(), 1);
        assert_eq!(doc["experience"][0]["role"], "");

        let response = app
            .oneshot(json_request(
                "DELETE",
                "/api/document/items",
                json!({ "list": "skills", "index": 99 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_skill_and_tech_tags_are_trimmed() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/document/skills",
                json!({ "text": "  Rust  " }),
            ))
            .await
            .unwrap();
        let skills = body_json(response).await["skills"].clone();
        assert_eq!(skills.as_array().unwrap().len(), 7);
        assert_eq!(skills[6], "Rust");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/document/skills",
                json!({ "text": "   " }),
            ))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await["skills"].as_array().unwrap().len(),
            7
        );

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/document/projects/0/tech",
                json!({ "text": " Axum " }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["projects"][0]["tech"][4], "Axum");
    }

    #[tokio::test]
    async fn test_tab_switching() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/session/tab", json!({ "tab": "projects" })))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["tab"], "projects");

        let session = body_json(app.oneshot(get("/api/session")).await.unwrap()).await;
        assert_eq!(session["tab"], "projects");
        assert_eq!(session["status"]["state"], "unsaved");
        assert_eq!(session["public_link"], Value::Null);
    }

    #[tokio::test]
    async fn test_publish_then_republish_sends_id() {
        let remote = Arc::new(FakeRemote::default());
        let (app, _) = app_with(remote.clone());

        let response = app.clone().oneshot(json_request("POST", "/api/publish", json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "id": "42", "slug": "abc", "link": "/p/abc" })
        );

        let session = body_json(app.clone().oneshot(get("/api/session")).await.unwrap()).await;
        assert_eq!(session["status"], json!({ "state": "saved", "id": "42", "slug": "abc" }));
        assert_eq!(session["public_link"], "/p/abc");

        app.oneshot(json_request("POST", "/api/publish", json!({})))
            .await
            .unwrap();
        assert_eq!(
            *remote.sent_ids.lock().unwrap(),
            vec![None, Some("42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_publish_failure_surfaces_message_and_keeps_status() {
        let remote = Arc::new(FakeRemote {
            reject_with: Some("Title too long".into()),
            ..FakeRemote::default()
        });
        let (app, state) = app_with(remote);

        let response = app.oneshot(json_request("POST", "/api/publish", json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "Title too long");

        let session = state.session.lock().await;
        assert_eq!(session.status(), &crate::persistence::SaveStatus::Unsaved);
        assert_eq!(session.document(), &default_document());
    }

    #[tokio::test]
    async fn test_overlapping_publish_is_rejected() {
        let gate = Arc::new(Notify::new());
        let remote = Arc::new(FakeRemote {
            gate: Some(gate.clone()),
            ..FakeRemote::default()
        });
        let (app, state) = app_with(remote);

        let first = tokio::spawn(
            app.clone()
                .oneshot(json_request("POST", "/api/publish", json!({}))),
        );
        while !state.session.lock().await.status().is_saving() {
            tokio::task::yield_now().await;
        }

        let second = app
            .oneshot(json_request("POST", "/api/publish", json!({})))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dropped_publish_still_settles_status() {
        let gate = Arc::new(Notify::new());
        let remote = Arc::new(FakeRemote {
            gate: Some(gate.clone()),
            ..FakeRemote::default()
        });
        let (app, state) = app_with(remote.clone());

        let dropped = tokio::time::timeout(
            Duration::from_millis(20),
            app.clone()
                .oneshot(json_request("POST", "/api/publish", json!({}))),
        )
        .await;
        assert!(dropped.is_err(), "publish should still be waiting on the remote");

        gate.notify_one();
        while state.session.lock().await.status().is_saving() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            state.session.lock().await.status().saved().and_then(|s| s.id.clone()),
            Some("42".to_string())
        );

        gate.notify_one();
        let next = app
            .oneshot(json_request("POST", "/api/publish", json!({})))
            .await
            .unwrap();
        assert_eq!(next.status(), StatusCode::OK);
        assert_eq!(
            *remote.sent_ids.lock().unwrap(),
            vec![None, Some("42".to_string())]
        );
    }

    #[tokio::test]
    async fn test_public_slug_opens_preview() {
        let mut published = default_document();
        published.profile.name = "Grace Hopper".into();
        let remote = Arc::new(FakeRemote {
            public: Some(("abc".into(), published.clone())),
            ..FakeRemote::default()
        });
        let (app, state) = app_with(remote);

        let response = app.oneshot(get("/p/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("Grace Hopper"));

        let session = state.session.lock().await;
        assert_eq!(session.document(), &published);
        assert_eq!(session.tab(), crate::session::Tab::Preview);
        assert_eq!(
            session.status().saved().map(|s| (s.id.clone(), s.slug.as_str())),
            Some((None, "abc"))
        );
    }

    #[tokio::test]
    async fn test_unknown_slug_keeps_current_state() {
        let (app, state) = app_with(Arc::new(FakeRemote::default()));
        let response = app.oneshot(get("/p/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let session = state.session.lock().await;
        assert_eq!(session.tab(), crate::session::Tab::Profile);
        assert_eq!(session.document(), &default_document());
        assert!(session.status().saved().is_none());
    }

    #[tokio::test]
    async fn test_preview_endpoints() {
        let app = app();
        let layout = body_json(app.clone().oneshot(get("/api/preview")).await.unwrap()).await;
        assert_eq!(layout["theme"], "classic");
        assert_eq!(layout["root"]["kind"], "stack");

        app.clone()
            .oneshot(json_request(
                "PATCH",
                "/api/document/field",
                json!({ "path": "meta.dark", "value": true }),
            ))
            .await
            .unwrap();
        let response = app.oneshot(get("/preview")).await.unwrap();
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<body class=\"dark\">"));
        assert!(html.contains("<title>Your Name - Resume</title>"));
    }

    #[tokio::test]
    async fn test_export_downloads_pdf() {
        let response = app().oneshot(get("/api/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("filename=\"Your_Name_Resume.pdf\""));
        assert!(body_bytes(response).await.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_reset_restores_default_document() {
        let app = app();
        app.clone()
            .oneshot(json_request(
                "PATCH",
                "/api/document/field",
                json!({ "path": "skills", "value": [] }),
            ))
            .await
            .unwrap();
        let response = app
            .oneshot(json_request("POST", "/api/document/reset", json!({})))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            serde_json::to_value(default_document()).unwrap()
        );
    }
}
