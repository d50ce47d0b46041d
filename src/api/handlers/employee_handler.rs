//! Employee handlers: CRUD, project links, profile pictures, images,
//! and company-grouped reports.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::upload_handler::read_upload;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Employee, EmployeeDetail, Image};
use crate::errors::AppResult;
use crate::services::EmployeeInput;
use crate::types::{ListQuery, MessageResponse, NoContent, Paginated};

/// Employee create/update request, including assignment id lists
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Alice Smith")]
    pub full_name: String,
    #[validate(length(min = 1, message = "Position is required"))]
    #[schema(example = "Engineer")]
    pub position: String,
    /// Companies the employee belongs to
    #[serde(default)]
    pub company_ids: Vec<i32>,
    /// Projects the employee is assigned to
    #[serde(default)]
    pub project_ids: Vec<i32>,
}

/// Create employee routes
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/report/pdf", get(employee_report_pdf))
        .route("/report/excel", get(employee_report_excel))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route(
            "/:id/projects/:project_id",
            axum::routing::post(assign_project).delete(remove_project),
        )
        .route("/:id/profile-picture", axum::routing::post(upload_profile_picture))
        .route(
            "/:id/images",
            get(list_employee_images).post(upload_employee_image),
        )
}

/// List employees with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of employees"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Employee>>> {
    let page = state.employee_service.list(query).await?;
    Ok(Json(page))
}

/// Get an employee with companies and projects
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Employee detail", body = EmployeeDetail),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EmployeeDetail>> {
    let employee = state.employee_service.get(id).await?;
    Ok(Json(employee))
}

/// Create an employee with company and project assignments
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Employee created", body = EmployeeDetail),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Referenced company or project not found")
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> AppResult<(StatusCode, Json<EmployeeDetail>)> {
    let employee = state
        .employee_service
        .create(EmployeeInput {
            full_name: payload.full_name,
            position: payload.position,
            company_ids: payload.company_ids,
            project_ids: payload.project_ids,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Update an employee, replacing its assignments
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    request_body = EmployeeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Employee updated", body = EmployeeDetail),
        (status = 404, description = "Employee, company, or project not found")
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> AppResult<Json<EmployeeDetail>> {
    let employee = state
        .employee_service
        .update(
            id,
            EmployeeInput {
                full_name: payload.full_name,
                position: payload.position,
                company_ids: payload.company_ids,
                project_ids: payload.project_ids,
            },
        )
        .await?;
    Ok(Json(employee))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.employee_service.delete(id).await?;
    Ok(NoContent)
}

/// Assign a project to an employee
#[utoipa::path(
    post,
    path = "/api/employees/{id}/projects/{project_id}",
    tag = "Employees",
    params(
        ("id" = i32, Path, description = "Employee id"),
        ("project_id" = i32, Path, description = "Project id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Project assigned", body = MessageResponse),
        (status = 404, description = "Employee or project not found")
    )
)]
pub async fn assign_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    state.employee_service.assign_project(id, project_id).await?;
    Ok(Json(MessageResponse::new("Project assigned to employee.")))
}

/// Remove a project from an employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}/projects/{project_id}",
    tag = "Employees",
    params(
        ("id" = i32, Path, description = "Employee id"),
        ("project_id" = i32, Path, description = "Project id")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Project removed"),
        (status = 404, description = "Relationship not found")
    )
)]
pub async fn remove_project(
    State(state): State<AppState>,
    Path((id, project_id)): Path<(i32, i32)>,
) -> AppResult<NoContent> {
    state.employee_service.remove_project(id, project_id).await?;
    Ok(NoContent)
}

/// Upload an employee's profile picture (multipart)
#[utoipa::path(
    post,
    path = "/api/employees/{id}/profile-picture",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile picture stored", body = MessageResponse),
        (status = 400, description = "Missing or empty file"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let (data, file_name) = read_upload(&mut multipart).await?;
    let path = state
        .employee_service
        .set_profile_picture(id, data, file_name)
        .await?;
    Ok(Json(MessageResponse::new(path)))
}

/// Upload an image to an employee's gallery (multipart)
#[utoipa::path(
    post,
    path = "/api/employees/{id}/images",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Image stored", body = Image),
        (status = 400, description = "Missing or empty file"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn upload_employee_image(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Image>)> {
    let (data, file_name) = read_upload(&mut multipart).await?;
    let image = state.upload_service.upload_image(id, data, file_name).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// List an employee's gallery images
#[utoipa::path(
    get,
    path = "/api/employees/{id}/images",
    tag = "Employees",
    params(("id" = i32, Path, description = "Employee id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Employee images", body = [Image]),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn list_employee_images(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Image>>> {
    let images = state.upload_service.employee_images(id).await?;
    Ok(Json(images))
}

/// Download the employee report as PDF
#[utoipa::path(
    get,
    path = "/api/employees/report/pdf",
    tag = "Employees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PDF report (application/pdf)")
    )
)]
pub async fn employee_report_pdf(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let bytes = state.report_service.employee_report_pdf().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"EmployeeReport.pdf\"",
            ),
        ],
        bytes,
    ))
}

/// Download the employee report as Excel
#[utoipa::path(
    get,
    path = "/api/employees/report/excel",
    tag = "Employees",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Excel report (xlsx)")
    )
)]
pub async fn employee_report_excel(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let bytes = state.report_service.employee_report_excel().await?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"EmployeeReport.xlsx\"",
            ),
        ],
        bytes,
    ))
}
