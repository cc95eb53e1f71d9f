use agentdesk_types::{NewSkill, Skill, SkillCategory};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState, IdQuery};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateSkillBody {
    #[serde(default)]
    name: Value,
    description: Option<String>,
    category: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateSkillBody {
    id: Option<String>,
    content: Option<String>,
}

const NOT_FOUND: &str = "Skill not found";

pub(crate) async fn list_or_get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.id() {
        Some(id) => {
            let skill = state
                .skills
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
            Ok(Json(skill).into_response())
        }
        None => Ok(Json(state.skills.list().await?).into_response()),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateSkillBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let Json(body) = body?;
    let name = body
        .name
        .as_str()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;

    let mut input = NewSkill::new(name);
    if let Some(description) = body.description.filter(|d| !d.is_empty()) {
        input = input.with_description(description);
    }
    if let Some(category) = body.category.filter(|c| !c.is_empty()) {
        input = input.with_category(category);
    }
    if let Some(content) = body.content {
        input = input.with_content(content);
    }

    let skill = state.skills.create(input).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    body: Result<Json<UpdateSkillBody>, JsonRejection>,
) -> Result<Json<Skill>, ApiError> {
    let Json(body) = body?;
    let (Some(id), Some(content)) = (
        body.id.filter(|v| !v.is_empty()),
        body.content.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::bad_request("ID and content are required"));
    };

    state
        .skills
        .update_content(&id, &content)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub(crate) async fn remove(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let id = query.id().ok_or_else(|| ApiError::bad_request("ID is required"))?;

    if !state.skills.delete(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Json(json!({ "success": true })))
}

/// Advisory category list for pickers
pub(crate) async fn categories() -> Json<Value> {
    let categories: Vec<Value> = SkillCategory::ALL
        .iter()
        .map(|c| json!({ "id": c.as_str(), "name": c.display_name() }))
        .collect();
    Json(Value::Array(categories))
}
