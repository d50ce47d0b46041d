//! Employee domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::company::Company;
use super::project::Project;

/// Employee row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_path: Option<String>,
}

/// Employee with company and project assignments, returned by detail lookups
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    pub id: i32,
    pub full_name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_path: Option<String>,
    pub companies: Vec<Company>,
    pub projects: Vec<Project>,
}

impl EmployeeDetail {
    pub fn new(employee: Employee, companies: Vec<Company>, projects: Vec<Project>) -> Self {
        Self {
            id: employee.id,
            full_name: employee.full_name,
            position: employee.position,
            profile_picture_path: employee.profile_picture_path,
            companies,
            projects,
        }
    }
}
