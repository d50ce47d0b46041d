//! Company repository - filtered, sorted, paginated access to companies.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::entities::{company, company_employee, employee};
use crate::domain::{Company, Employee};
use crate::errors::{AppError, AppResult};
use crate::types::ListQuery;

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Filtered/sorted/paginated listing. Returns the page plus the total
    /// number of matching rows.
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Company>, u64)>;

    /// Every company, unpaginated (report generation)
    async fn list_all(&self) -> AppResult<Vec<Company>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Company>>;

    async fn employees_of(&self, id: i32) -> AppResult<Vec<Employee>>;

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    async fn create(&self, name: String) -> AppResult<Company>;

    async fn update(&self, id: i32, name: String) -> AppResult<Company>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of `CompanyRepository`
pub struct CompanyStore {
    db: DatabaseConnection,
}

impl CompanyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Apply the list query's filter and sort to a select.
    /// Accepted sort keys: `name` (default), `id`.
    fn apply_query(query: &ListQuery) -> Select<company::Entity> {
        let mut select = company::Entity::find();

        if let Some(term) = query.search_term.as_deref().filter(|t| !t.is_empty()) {
            select = select.filter(company::Column::Name.contains(term));
        }

        let descending = query.sort_dir.is_descending();
        match query.sort_key().as_deref() {
            Some("id") => {
                if descending {
                    select.order_by_desc(company::Column::Id)
                } else {
                    select.order_by_asc(company::Column::Id)
                }
            }
            _ => {
                if descending {
                    select.order_by_desc(company::Column::Name)
                } else {
                    select.order_by_asc(company::Column::Name)
                }
            }
        }
    }
}

#[async_trait]
impl CompanyRepository for CompanyStore {
    async fn list(&self, query: &ListQuery) -> AppResult<(Vec<Company>, u64)> {
        let paginator = Self::apply_query(query).paginate(&self.db, query.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page_index()).await?;
        Ok((models.into_iter().map(Company::from).collect(), total))
    }

    async fn list_all(&self) -> AppResult<Vec<Company>> {
        let models = company::Entity::find()
            .order_by_asc(company::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Company::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Company>> {
        let result = company::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Company::from))
    }

    async fn employees_of(&self, id: i32) -> AppResult<Vec<Employee>> {
        let employee_ids: Vec<i32> = company_employee::Entity::find()
            .filter(company_employee::Column::CompanyId.eq(id))
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

    async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let mut select = company::Entity::find().filter(company::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            select = select.filter(company::Column::Id.ne(id));
        }
        Ok(select.count(&self.db).await? > 0)
    }

    async fn create(&self, name: String) -> AppResult<Company> {
        let active_model = company::ActiveModel {
            name: Set(name),
            ..Default::default()
        };
        let model = active_model.insert(&self.db).await?;
        Ok(Company::from(model))
    }

    async fn update(&self, id: i32, name: String) -> AppResult<Company> {
        let model = company::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Company"))?;

        let mut active: company::ActiveModel = model.into();
        active.name = Set(name);
        let model = active.update(&self.db).await?;
        Ok(Company::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = company::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Company"));
        }
        Ok(())
    }
}
