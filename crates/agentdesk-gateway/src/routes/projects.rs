use agentdesk_types::{NewProject, Project};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, AppState, IdQuery};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectBody {
    #[serde(default)]
    name: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProjectBody {
    id: Option<String>,
    name: Option<String>,
}

const NOT_FOUND: &str = "Project not found";

pub(crate) async fn list_or_get(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    match query.id() {
        Some(id) => {
            let project = state
                .projects
                .get(id)
                .await?
                .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
            Ok(Json(project).into_response())
        }
        None => Ok(Json(state.projects.list().await?).into_response()),
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateProjectBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(body) = body?;
    let name = body
        .name
        .as_str()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Name is required"))?;

    let project = state.projects.create(NewProject::new(name)).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    body: Result<Json<UpdateProjectBody>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let Json(body) = body?;
    let (Some(id), Some(name)) = (
        body.id.filter(|v| !v.is_empty()),
        body.name.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::bad_request("ID and name are required"));
    };

    state
        .projects
        .rename(&id, &name)
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

    if !state.projects.delete(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(Json(json!({ "success": true })))
}
