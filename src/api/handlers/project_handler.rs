//! Project handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Project, ProjectDetail};
use crate::errors::AppResult;
use crate::services::ProjectInput;
use crate::types::{ListQuery, NoContent, Paginated};

/// Project create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Data Migration")]
    pub title: String,
    /// Project duration in whole days
    #[validate(range(min = 1, message = "Duration must be at least one day"))]
    #[schema(example = 30)]
    pub duration_days: i32,
}

/// Create project routes
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// List projects with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of projects"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Project>>> {
    let page = state.project_service.list(query).await?;
    Ok(Json(page))
}

/// Get a project with its assigned employees
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Project detail", body = ProjectDetail),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProjectDetail>> {
    let project = state.project_service.get(id).await?;
    Ok(Json(project))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = ProjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state
        .project_service
        .create(ProjectInput {
            title: payload.title,
            duration_days: payload.duration_days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a project
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project id")),
    request_body = ProjectRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ProjectRequest>,
) -> AppResult<Json<Project>> {
    let project = state
        .project_service
        .update(
            id,
            ProjectInput {
                title: payload.title,
                duration_days: payload.duration_days,
            },
        )
        .await?;
    Ok(Json(project))
}

/// Delete a project
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = i32, Path, description = "Project id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.project_service.delete(id).await?;
    Ok(NoContent)
}
