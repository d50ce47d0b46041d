//! Project repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entities::{employee, employee_project, project};
use crate::domain::{Employee, Project};
use crate::errors::{AppError, AppResult};
use crate::types::ListQuery;

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Filtered/sorted/paginated listing. Returns the page plus the total
    /// number of matching rows.
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Project>, u64)>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>>;

    async fn employees_of(&self, id: i32) -> AppResult<Vec<Employee>>;

    async fn create(&self, title: String, duration_days: i32) -> AppResult<Project>;

    async fn update(&self, id: i32, title: String, duration_days: i32) -> AppResult<Project>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of `ProjectRepository`
pub struct ProjectStore {
    db: DatabaseConnection,
}

impl ProjectStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Apply the list query's filter and sort to a select.
    /// Accepted sort keys: `title` (default), `id`.
    fn apply_query(query: &ListQuery) -> Select<project::Entity> {
        let mut select = project::Entity::find();

        if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(project::Column::Title.contains(term));
        }

        let descending = query.sort_dir.is_descending();
        match query.sort_key().as_deref() {
            Some("id") => {
                if descending {
                    select.order_by_desc(project::Column::Id)
                } else {
                    select.order_by_asc(project::Column::Id)
                }
            }
            _ => {
                if descending {
                    select.order_by_desc(project::Column::Title)
                } else {
                    select.order_by_asc(project::Column::Title)
                }
            }
        }
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Project>, u64)> {
        let paginator = Self::apply_query(query).paginate(&self.db, query.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page_index()).await?;
        Ok((models.into_iter().map(Project::from).collect(), total))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>> {
        let result = project::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Project::from))
    }

    async fn employees_of(&self, id: i32) -> AppResult<Vec<Employee>> {
        let employee_ids: Vec<i32> = employee_project::Entity::find()
            .filter(employee_project::Column::ProjectId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.employee_id)
            .collect();

        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = employee::Entity::find()
            .filter(employee::Column::Id.is_in(employee_ids))
            .order_by_asc(employee::Column::FullName)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Employee::from).collect())
    }

    async fn create(&self, title: String, duration_days: i32) -> AppResult<Project> {
        let active_model = project::ActiveModel {
            title: Set(title),
            duration_days: Set(duration_days),
            ..Default::default()
        };
        let model = active_model.insert(&self.db).await?;
        Ok(Project::from(model))
    }

    async fn update(&self, id: i32, title: String, duration_days: i32) -> AppResult<Project> {
        let model = project::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))?;

        let mut active: project::ActiveModel = model.into();
        active.title = Set(title);
        active.duration_days = Set(duration_days);
        let model = active.update(&self.db).await?;
        Ok(Project::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = project::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Project"));
        }
        Ok(())
    }
}
