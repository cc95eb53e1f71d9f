//! Router tests driven in-process over a file store in a temp directory

use std::sync::{Arc, Mutex};

use agentdesk_gateway::{router, AppState};
use agentdesk_persistence::Storage;
use agentdesk_provider::{
    is_placeholder_key, AgentDispatcher, AgentError, GenerationConfig, Result as AgentResult,
    TextBackend,
};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

enum Reply {
    Text(&'static str),
    Fail(u16),
}

struct StubBackend {
    key: &'static str,
    reply: Reply,
    calls: Mutex<usize>,
}

#[async_trait]
impl TextBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    fn ensure_configured(&self) -> AgentResult<()> {
        if is_placeholder_key(self.key) {
            return Err(AgentError::Configuration(
                "Google API key not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn generate(&self, _prompt: &str, _generation: &GenerationConfig) -> AgentResult<String> {
        *self.calls.lock().unwrap() += 1;
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail(status) => Err(AgentError::Backend {
                status: Some(status),
                message: "quota exceeded".to_string(),
            }),
        }
    }
}

fn app_with(backend: Arc<StubBackend>) -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(Storage::file(dir.path()), AgentDispatcher::new(backend));
    (router(state, true), dir)
}

fn app() -> (Router, TempDir) {
    app_with(Arc::new(StubBackend {
        key: "test-key",
        reply: Reply::Text("ok"),
        calls: Mutex::new(0),
    }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_project_lifecycle() {
    let (app, _dir) = app();

    let (status, created) =
        send(&app, Method::POST, "/api/projects", Some(json!({"name": "Q3 Review"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("q3-review-"));
    assert!(created["createdAt"].is_string());

    let (status, list) = send(&app, Method::GET, "/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, renamed) = send(
        &app,
        Method::PUT,
        "/api/projects",
        Some(json!({"id": id, "name": "Q4 Review"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Q4 Review");

    let (status, fetched) = send(&app, Method::GET, &format!("/api/projects?id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Q4 Review");

    let uri = format!("/api/projects?id={}", id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Project not found"}));
}

#[tokio::test]
async fn test_project_validation() {
    let (app, _dir) = app();

    let (status, body) = send(&app, Method::POST, "/api/projects", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Name is required"}));

    let (status, body) = send(&app, Method::POST, "/api/projects", Some(json!({"name": 42}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, body) = send(&app, Method::POST, "/api/projects", Some(json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");

    let (status, body) = send_raw(&app, Method::POST, "/api/projects", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid request"}));

    let (status, body) = send(&app, Method::PUT, "/api/projects", Some(json!({"id": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID and name are required");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/projects",
        Some(json!({"id": "missing-abc123", "name": "New"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, body) = send(&app, Method::DELETE, "/api/projects", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID is required");

    let (status, _) = send(&app, Method::GET, "/api/projects?id=missing-abc123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_skill_lifecycle() {
    let (app, _dir) = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(json!({"name": "Churn Model", "content": "# Churn\n\nSteps."})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], "");
    assert_eq!(created["category"], "analytics");
    assert_eq!(created["content"], "# Churn\n\nSteps.");
    let id = created["id"].as_str().unwrap().to_string();

    let (_, list) = send(&app, Method::GET, "/api/skills", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert!(list[0].get("content").is_none());

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/skills",
        Some(json!({"id": id, "content": "v2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "v2");

    let (_, fetched) = send(&app, Method::GET, &format!("/api/skills?id={}", id), None).await;
    assert_eq!(fetched["content"], "v2");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/skills?id={}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, &format!("/api/skills?id={}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Skill not found");
}

#[tokio::test]
async fn test_skill_defaults_and_validation() {
    let (app, _dir) = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(json!({"name": "Weekly Digest", "description": "", "category": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["category"], "analytics");
    assert_eq!(created["content"], "# Weekly Digest\n\nAdd your skill content here.");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/skills",
        Some(json!({"id": created["id"], "content": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID and content are required");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/skills",
        Some(json!({"id": "nope-000000", "content": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Skill not found");
}

#[tokio::test]
async fn test_catalogues() {
    let (app, _dir) = app();

    let (_, categories) = send(&app, Method::GET, "/api/skills/categories", None).await;
    assert_eq!(categories[0], json!({"id": "analytics", "name": "Analytics"}));
    assert_eq!(categories.as_array().unwrap().len(), 4);

    let (_, modes) = send(&app, Method::GET, "/api/agents/modes", None).await;
    assert_eq!(modes[0], json!({"id": "analyst", "name": "Data Analyst"}));
    assert_eq!(modes.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_agent_dispatch() {
    let (app, _dir) = app_with(Arc::new(StubBackend {
        key: "test-key",
        reply: Reply::Text("Result: {\"findings\": [], \"metrics\": {\"growth\": 0.12}}"),
        calls: Mutex::new(0),
    }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/agents",
        Some(json!({"query": "How are we doing?", "context": {"projectId": "p-1"}, "mode": "wizard"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["mode"], "analyst");
    assert_eq!(body["structured"]["metrics"]["growth"], 0.12);
    assert!(body["output"].as_str().unwrap().starts_with("Result: "));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_agent_errors() {
    let unconfigured = Arc::new(StubBackend {
        key: "your-google-api-key-here",
        reply: Reply::Text("never"),
        calls: Mutex::new(0),
    });
    let (app, _dir) = app_with(unconfigured.clone());
    let (status, body) = send(&app, Method::POST, "/api/agents", Some(json!({"query": "q"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Google API key not configured"}));
    assert_eq!(*unconfigured.calls.lock().unwrap(), 0);

    let (app, _dir) = app_with(Arc::new(StubBackend {
        key: "test-key",
        reply: Reply::Fail(429),
        calls: Mutex::new(0),
    }));
    let (status, body) = send(&app, Method::POST, "/api/agents", Some(json!({"query": "q"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to get response from AI");

    let (status, body) = send(&app, Method::POST, "/api/agents", Some(json!({"query": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");

    let (status, body) = send_raw(&app, Method::POST, "/api/agents", "[1, 2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");
}

#[tokio::test]
async fn test_agent_accepts_loose_context_and_mode() {
    let (app, _dir) = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/agents",
        Some(json!({"query": "q", "context": {"projectId": 7, "filters": [1, 2]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "analyst");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/agents",
        Some(json!({"query": "q", "mode": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "analyst");
}
