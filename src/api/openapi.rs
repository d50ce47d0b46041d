//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, company_handler, employee_handler, project_handler, upload_handler,
};
use crate::domain::{Company, CompanyDetail, Employee, EmployeeDetail, Image, Project, ProjectDetail};
use crate::services::TokenResponse;
use crate::types::{MessageResponse, SortDir};

/// OpenAPI documentation for the Company Management API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Management API",
        version = "0.1.0",
        description = "Companies, employees, and projects with JWT authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::assign_role,
        auth_handler::request_password_reset,
        auth_handler::reset_password,
        // Company endpoints
        company_handler::list_companies,
        company_handler::get_company,
        company_handler::create_company,
        company_handler::update_company,
        company_handler::delete_company,
        // Employee endpoints
        employee_handler::list_employees,
        employee_handler::get_employee,
        employee_handler::create_employee,
        employee_handler::update_employee,
        employee_handler::delete_employee,
        employee_handler::assign_project,
        employee_handler::remove_project,
        employee_handler::upload_profile_picture,
        employee_handler::upload_employee_image,
        employee_handler::list_employee_images,
        employee_handler::employee_report_pdf,
        employee_handler::employee_report_excel,
        // Project endpoints
        project_handler::list_projects,
        project_handler::get_project,
        project_handler::create_project,
        project_handler::update_project,
        project_handler::delete_project,
        // Image endpoints
        upload_handler::delete_image,
    ),
    components(
        schemas(
            // Domain types
            Company,
            CompanyDetail,
            Employee,
            EmployeeDetail,
            Project,
            ProjectDetail,
            Image,
            SortDir,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AssignRoleRequest,
            auth_handler::PasswordResetRequest,
            auth_handler::ResetPasswordRequest,
            TokenResponse,
            MessageResponse,
            // Resource request types
            company_handler::CompanyRequest,
            employee_handler::EmployeeRequest,
            project_handler::ProjectRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, roles, password reset"),
        (name = "Companies", description = "Company management"),
        (name = "Employees", description = "Employee management, uploads, reports"),
        (name = "Projects", description = "Project management"),
        (name = "Images", description = "Uploaded image management")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
