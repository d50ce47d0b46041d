//! Company domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::employee::Employee;

/// Company row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    pub id: i32,
    pub name: String,
}

/// Company with its assigned employees, returned by detail lookups
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyDetail {
    pub id: i32,
    pub name: String,
    pub employees: Vec<Employee>,
}

impl CompanyDetail {
    pub fn new(company: Company, employees: Vec<Employee>) -> Self {
        Self {
            id: company.id,
            name: company.name,
            employees,
        }
    }
}
