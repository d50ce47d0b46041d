//! Employee service - employee CRUD, assignment management, and
//! profile picture upload.
//!
//! Create and update rewrite the company/project junctions together with
//! the employee row, so those paths run inside a unit-of-work
//! transaction.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::UPLOAD_FOLDER_EMPLOYEES;
use crate::domain::{Employee, EmployeeDetail};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStore, UnitOfWork};
use crate::types::{ListQuery, Paginated};
use crate::with_transaction;

/// Employee create/update input, including assignment id lists
#[derive(Debug, Clone)]
pub struct EmployeeInput {
    pub full_name: String,
    pub position: String,
    pub company_ids: Vec<i32>,
    pub project_ids: Vec<i32>,
}

#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Filtered, sorted, paginated employee listing
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Employee>>;

    /// Employee with company and project assignments
    async fn get(&self, id: i32) -> AppResult<EmployeeDetail>;

    async fn create(&self, input: EmployeeInput) -> AppResult<EmployeeDetail>;

    async fn update(&self, id: i32, input: EmployeeInput) -> AppResult<EmployeeDetail>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Link a single project. A link that already exists is a no-op.
    async fn assign_project(&self, employee_id: i32, project_id: i32) -> AppResult<()>;

    async fn remove_project(&self, employee_id: i32, project_id: i32) -> AppResult<()>;

    /// Store a profile picture and return its relative path
    async fn set_profile_picture(
        &self,
        id: i32,
        data: Vec<u8>,
        original_name: String,
    ) -> AppResult<String>;
}

/// Concrete implementation of EmployeeService using Unit of Work.
pub struct EmployeeManager<U: UnitOfWork> {
    uow: Arc<U>,
    files: FileStore,
}

impl<U: UnitOfWork> EmployeeManager<U> {
    pub fn new(uow: Arc<U>, files: FileStore) -> Self {
        Self { uow, files }
    }

    async fn detail_of(&self, employee: Employee) -> AppResult<EmployeeDetail> {
        let companies = self.uow.employees().companies_of(employee.id).await?;
        let projects = self.uow.employees().projects_of(employee.id).await?;
        Ok(EmployeeDetail::new(employee, companies, projects))
    }
}

#[async_trait]
impl<U: UnitOfWork> EmployeeService for EmployeeManager<U> {
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Employee>> {
        let (data, total) = self.uow.employees().list(&query).await?;
        Ok(Paginated::new(data, query.page, query.limit(), total))
    }

    async fn get(&self, id: i32) -> AppResult<EmployeeDetail> {
        let employee = self
            .uow
            .employees()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Employee")?;
        self.detail_of(employee).await
    }

    async fn create(&self, input: EmployeeInput) -> AppResult<EmployeeDetail> {
        let employee = with_transaction!(self.uow, |ctx| {
            ctx.employees()
                .create_with_assignments(
                    input.full_name,
                    input.position,
                    &input.company_ids,
                    &input.project_ids,
                )
                .await
        })?;

        tracing::info!(employee = %employee.full_name, "Employee created");
        self.detail_of(employee).await
    }

    async fn update(&self, id: i32, input: EmployeeInput) -> AppResult<EmployeeDetail> {
        let employee = with_transaction!(self.uow, |ctx| {
            ctx.employees()
                .update_with_assignments(
                    id,
                    input.full_name,
                    input.position,
                    &input.company_ids,
                    &input.project_ids,
                )
                .await
        })?;

        self.detail_of(employee).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.uow.employees().delete(id).await
    }

    async fn assign_project(&self, employee_id: i32, project_id: i32) -> AppResult<()> {
        self.uow
            .employees()
            .find_by_id(employee_id)
            .await?
            .ok_or_not_found("Employee")?;
        self.uow
            .projects()
            .find_by_id(project_id)
            .await?
            .ok_or_not_found("Project")?;

        if self
            .uow
            .employees()
            .project_link_exists(employee_id, project_id)
            .await?
        {
            return Ok(());
        }

        self.uow.employees().link_project(employee_id, project_id).await
    }

    async fn remove_project(&self, employee_id: i32, project_id: i32) -> AppResult<()> {
        let removed = self
            .uow
            .employees()
            .unlink_project(employee_id, project_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Employee-Project relationship"));
        }
        Ok(())
    }

    async fn set_profile_picture(
        &self,
        id: i32,
        data: Vec<u8>,
        original_name: String,
    ) -> AppResult<String> {
        self.uow
            .employees()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Employee")?;

        let path = self
            .files
            .save(&data, UPLOAD_FOLDER_EMPLOYEES, &original_name)
            .await?;
        self.uow.employees().set_profile_picture(id, path.clone()).await?;

        Ok(path)
    }
}
