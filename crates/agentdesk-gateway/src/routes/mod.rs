//! HTTP routes
//!
//! - `/api/projects`: project CRUD (`?id=` selects a single record)
//! - `/api/skills`: skill CRUD, `/api/skills/categories`
//! - `/api/agents`: agent dispatch, `/api/agents/modes`
//! - `/health`

mod agents;
mod error;
mod projects;
mod skills;

use std::sync::Arc;

use agentdesk_persistence::{ProjectRepository, SkillRepository, Storage};
use agentdesk_provider::AgentDispatcher;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub projects: Arc<dyn ProjectRepository>,
    pub skills: Arc<dyn SkillRepository>,
    pub dispatcher: AgentDispatcher,
}

impl AppState {
    pub fn new(storage: Storage, dispatcher: AgentDispatcher) -> Self {
        Self {
            projects: storage.projects,
            skills: storage.skills,
            dispatcher,
        }
    }
}

/// `?id=` on GET and DELETE
#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id, treating `?id=` as absent
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

pub fn router(state: AppState, cors: bool) -> Router {
    let app = Router::new()
        .route(
            "/api/projects",
            get(projects::list_or_get)
                .post(projects::create)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/api/skills",
            get(skills::list_or_get)
                .post(skills::create)
                .put(skills::update)
                .delete(skills::remove),
        )
        .route("/api/skills/categories", get(skills::categories))
        .route("/api/agents", post(agents::dispatch))
        .route("/api/agents/modes", get(agents::modes))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
