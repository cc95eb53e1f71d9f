use agentdesk_types::{AgentMode, AgentRequest, AgentResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::{ApiError, AppState};

pub(crate) async fn dispatch(
    State(state): State<AppState>,
    body: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, ApiError> {
    let Json(request) = body?;
    let response = state.dispatcher.dispatch(request).await?;
    Ok(Json(response))
}

pub(crate) async fn modes() -> Json<Value> {
    let modes: Vec<Value> = AgentMode::ALL
        .iter()
        .map(|m| json!({ "id": m.as_str(), "name": m.title() }))
        .collect();
    Json(Value::Array(modes))
}
