//! Employee repository - listing, lookups, and project links.
//!
//! Creation and update rewrite junction rows and therefore live on the
//! transaction-scoped repository in `unit_of_work`.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entities::{company, company_employee, employee, employee_project, project};
use crate::domain::{Company, Employee, Project};
use crate::errors::{AppError, AppResult};
use crate::types::ListQuery;

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Filtered/sorted/paginated listing. Returns the page plus the total
    /// number of matching rows.
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Employee>, u64)>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Employee>>;

    async fn companies_of(&self, id: i32) -> AppResult<Vec<Company>>;

    async fn projects_of(&self, id: i32) -> AppResult<Vec<Project>>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    async fn set_profile_picture(&self, id: i32, path: String) -> AppResult<Employee>;

    async fn project_link_exists(&self, employee_id: i32, project_id: i32) -> AppResult<bool>;

    async fn link_project(&self, employee_id: i32, project_id: i32) -> AppResult<()>;

    /// Remove a single project link. Returns false when no link existed.
    async fn unlink_project(&self, employee_id: i32, project_id: i32) -> AppResult<bool>;
}

/// SeaORM-backed implementation of `EmployeeRepository`
pub struct EmployeeStore {
    db: DatabaseConnection,
}

impl EmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Apply the list query's filter and sort to a select.
    /// Accepted sort keys: `fullname` (default), `id`.
    fn apply_query(query: &ListQuery) -> Select<employee::Entity> {
        let mut select = employee::Entity::find();

        if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(employee::Column::FullName.contains(term));
        }

        let descending = query.sort_dir.is_descending();
        match query.sort_key().as_deref() {
            Some("id") => {
                if descending {
                    select.order_by_desc(employee::Column::Id)
                } else {
                    select.order_by_asc(employee::Column::Id)
                }
            }
            _ => {
                if descending {
                    select.order_by_desc(employee::Column::FullName)
                } else {
                    select.order_by_asc(employee::Column::FullName)
                }
            }
        }
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeStore {
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Employee>, u64)> {
        let paginator = Self::apply_query(query).paginate(&self.db, query.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page_index()).await?;
        Ok((models.into_iter().map(Employee::from).collect(), total))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Employee>> {
        let result = employee::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Employee::from))
    }

    async fn companies_of(&self, id: i32) -> AppResult<Vec<Company>> {
        let company_ids: Vec<i32> = company_employee::Entity::find()
            .filter(company_employee::Column::EmployeeId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.company_id)
            .collect();

        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = company::Entity::find()
            .filter(company::Column::Id.is_in(company_ids))
            .order_by_asc(company::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Company::from).collect())
    }

    async fn projects_of(&self, id: i32) -> AppResult<Vec<Project>> {
        let project_ids: Vec<i32> = employee_project::Entity::find()
            .filter(employee_project::Column::EmployeeId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.project_id)
            .collect();

        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = project::Entity::find()
            .filter(project::Column::Id.is_in(project_ids))
            .order_by_asc(project::Column::Title)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Project::from).collect())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = employee::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Employee"));
        }
        Ok(())
    }

    async fn set_profile_picture(&self, id: i32, path: String) -> AppResult<Employee> {
        let model = employee::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;

        let mut active: employee::ActiveModel = model.into();
        active.profile_picture_path = Set(Some(path));
        let model = active.update(&self.db).await?;
        Ok(Employee::from(model))
    }

    async fn project_link_exists(&self, employee_id: i32, project_id: i32) -> AppResult<bool> {
        let count = employee_project::Entity::find()
            .filter(employee_project::Column::EmployeeId.eq(employee_id))
            .filter(employee_project::Column::ProjectId.eq(project_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn link_project(&self, employee_id: i32, project_id: i32) -> AppResult<()> {
        let link = employee_project::ActiveModel {
            employee_id: Set(employee_id),
            project_id: Set(project_id),
        };
        link.insert(&self.db).await?;
        Ok(())
    }

    async fn unlink_project(&self, employee_id: i32, project_id: i32) -> AppResult<bool> {
        let result = employee_project::Entity::delete_many()
            .filter(employee_project::Column::EmployeeId.eq(employee_id))
            .filter(employee_project::Column::ProjectId.eq(project_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
