//! Company service - company CRUD and listing use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Company, CompanyDetail};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::CompanyRepository;
use crate::types::{ListQuery, Paginated};

#[async_trait]
pub trait CompanyService: Send + Sync {
    /// Filtered, sorted, paginated company listing
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Company>>;

    /// Company with its assigned employees
    async fn get(&self, id: i32) -> AppResult<CompanyDetail>;

    async fn create(&self, name: String) -> AppResult<Company>;

    async fn update(&self, id: i32, name: String) -> AppResult<Company>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of CompanyService.
pub struct CompanyManager {
    companies: Arc<dyn CompanyRepository>,
}

impl CompanyManager {
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }
}

#[async_trait]
impl CompanyService for CompanyManager {
    async fn list(&self, query: ListQuery) -> AppResult<Paginated<Company>> {
        let (data, total) = self.companies.list(&query).await?;
        Ok(Paginated::new(data, query.page, query.limit(), total))
    }

    async fn get(&self, id: i32) -> AppResult<CompanyDetail> {
        let company = self
            .companies
            .find_by_id(id)
            .await?
            .ok_or_not_found("Company")?;
        let employees = self.companies.employees_of(id).await?;
        Ok(CompanyDetail::new(company, employees))
    }

    async fn create(&self, name: String) -> AppResult<Company> {
        if self.companies.name_exists(&name, None).await? {
            return Err(AppError::conflict("Company name is already taken"));
        }
        let company = self.companies.create(name).await?;
        tracing::info!(company = %company.name, "Company created");
        Ok(company)
    }

    async fn update(&self, id: i32, name: String) -> AppResult<Company> {
        if self.companies.name_exists(&name, Some(id)).await? {
            return Err(AppError::conflict("Company name is already taken"));
        }
        self.companies.update(id, name).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.companies.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockCompanyRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_list_wraps_pagination_metadata() {
        let mut repo = MockCompanyRepository::new();
        repo.expect_list().returning(|_| {
            Ok((
                vec![Company {
                    id: 1,
                    name: "Acme".to_string(),
                }],
                21,
            ))
        });

        let service = CompanyManager::new(Arc::new(repo));
        let page = service
            .list(ListQuery {
                page: 2,
                page_size: 10,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.total, 21);
        assert_eq!(page.meta.total_pages, 3);
    }

    #[tokio::test]
    async fn test_get_missing_company_is_not_found() {
        let mut repo = MockCompanyRepository::new();
        repo.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let service = CompanyManager::new(Arc::new(repo));
        let result = service.get(42).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_conflict() {
        let mut repo = MockCompanyRepository::new();
        repo.expect_name_exists().returning(|_, _| Ok(true));
        repo.expect_create().never();

        let service = CompanyManager::new(Arc::new(repo));
        let result = service.create("Acme".to_string()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_includes_employees() {
        use crate::domain::Employee;

        let mut repo = MockCompanyRepository::new();
        repo.expect_find_by_id().returning(|id| {
            Ok(Some(Company {
                id,
                name: "Acme".to_string(),
            }))
        });
        repo.expect_employees_of().returning(|_| {
            Ok(vec![Employee {
                id: 7,
                full_name: "Alice Smith".to_string(),
                position: "Engineer".to_string(),
                profile_picture_path: None,
            }])
        });

        let service = CompanyManager::new(Arc::new(repo));
        let detail = service.get(1).await.unwrap();
        assert_eq!(detail.employees.len(), 1);
        assert_eq!(detail.employees[0].full_name, "Alice Smith");
    }
}
