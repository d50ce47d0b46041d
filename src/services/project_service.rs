//! Project service - project CRUD and listing use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Project, ProjectDetail};
use crate::errors::{AppResult, OptionExt};
use crate::infra::ProjectRepository;
use crate::types::{ListQuery, Paginated};

/// Project create/update input
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub title: String,
    pub duration_days: i32,
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Filtered, sorted, paginated project listing
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Project>>;

    /// Project with its assigned employees
    async fn get(&self, id: i32) -> AppResult<ProjectDetail>;

    async fn create(&self, input: ProjectInput) -> AppResult<Project>;

    async fn update(&self, id: i32, input: ProjectInput) -> AppResult<Project>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProjectService.
pub struct ProjectManager {
    projects: Arc<dyn ProjectRepository>,
}

impl ProjectManager {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }
}

#[async_trait]
impl ProjectService for ProjectManager {
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Project>> {
        let (data, total) = self.projects.list(&query).await?;
        Ok(Paginated::new(data, query.page, query.limit(), total))
    }

    async fn get(&self, id: i32) -> AppResult<ProjectDetail> {
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_not_found("Project")?;
        let employees = self.projects.employees_of(id).await?;
        Ok(ProjectDetail::new(project, employees))
    }

    async fn create(&self, input: ProjectInput) -> AppResult<Project> {
        let project = self
            .projects
            .create(input.title, input.duration_days)
            .await?;
        tracing::info!(project = %project.title, "Project created");
        Ok(project)
    }

    async fn update(&self, id: i32, input: ProjectInput) -> AppResult<Project> {
        self.projects
            .update(id, input.title, input.duration_days)
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.projects.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::MockProjectRepository;

    #[tokio::test]
    async fn test_get_missing_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_employees_of().never();

        let service = ProjectManager::new(Arc::new(repo));
        assert!(matches!(
            service.get(9).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_includes_assigned_employees() {
        use crate::domain::Employee;

        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_id().returning(|id| {
            Ok(Some(Project {
                id,
                title: "Migration".to_string(),
                duration_days: 30,
            }))
        });
        repo.expect_employees_of().returning(|_| {
            Ok(vec![Employee {
                id: 3,
                full_name: "Bob Jones".to_string(),
                position: "Analyst".to_string(),
                profile_picture_path: None,
            }])
        });

        let service = ProjectManager::new(Arc::new(repo));
        let detail = service.get(5).await.unwrap();
        assert_eq!(detail.title, "Migration");
        assert_eq!(detail.employees.len(), 1);
    }
}
