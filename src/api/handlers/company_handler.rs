//! Company handlers.

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
use crate::domain::{Company, CompanyDetail};
use crate::errors::AppResult;
use crate::types::{ListQuery, NoContent, Paginated};

/// Company create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompanyRequest {
    /// Company name (unique)
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    #[schema(example = "Acme Corp")]
    pub name: String,
}

/// Create company routes
pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route(
            "/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
}

/// List companies with filtering, sorting, and pagination
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    params(ListQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of companies"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<Company>>> {
    let page = state.company_service.list(query).await?;
    Ok(Json(page))
}

/// Get a company with its employees
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = i32, Path, description = "Company id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Company detail", body = CompanyDetail),
        (status = 404, description = "Company not found")
    )
)]
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CompanyDetail>> {
    let company = state.company_service.get(id).await?;
    Ok(Json(company))
}

/// Create a company
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CompanyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Validation error or duplicate name")
    )
)]
pub async fn create_company(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CompanyRequest>,
) -> AppResult<(StatusCode, Json<Company>)> {
    let company = state.company_service.create(payload.name).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Update a company
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = i32, Path, description = "Company id")),
    request_body = CompanyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 404, description = "Company not found")
    )
)]
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CompanyRequest>,
) -> AppResult<Json<Company>> {
    let company = state.company_service.update(id, payload.name).await?;
    Ok(Json(company))
}

/// Delete a company
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = i32, Path, description = "Company id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Company not found")
    )
)]
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<NoContent> {
    state.company_service.delete(id).await?;
    Ok(NoContent)
}
