//! Project domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::employee::Employee;

/// Project row. Duration is tracked in whole days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub duration_days: i32,
}

/// Project with its assigned employees, returned by detail lookups
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: i32,
    pub title: String,
    pub duration_days: i32,
    pub employees: Vec<Employee>,
}

impl ProjectDetail {
    pub fn new(project: Project, employees: Vec<Employee>) -> Self {
        Self {
            id: project.id,
            title: project.title,
            duration_days: project.duration_days,
            employees,
        }
    }
}
