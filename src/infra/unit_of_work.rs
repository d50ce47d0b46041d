//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to all repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Ensures consistency across multiple repository operations
//!
//! The employee write path is the one multi-statement mutation in the
//! system (row plus two junction rewrites), so the transaction context
//! exposes a transaction-scoped employee repository.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::repositories::entities::{company, company_employee, employee, employee_project, project};
use super::repositories::{
    CompanyRepository, CompanyStore, EmployeeRepository, EmployeeStore, ImageRepository,
    ImageStore, ProjectRepository, ProjectStore, ResetTokenRepository, ResetTokenStore,
    RoleRepository, RoleStore, UserRepository, UserStore,
};
use crate::domain::Employee;
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction management.
/// Note: the generic `transaction` method cannot be mocked directly; mock the
/// individual repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn roles(&self) -> Arc<dyn RoleRepository>;

    fn reset_tokens(&self) -> Arc<dyn ResetTokenRepository>;

    fn companies(&self) -> Arc<dyn CompanyRepository>;

    fn employees(&self) -> Arc<dyn EmployeeRepository>;

    fn projects(&self) -> Arc<dyn ProjectRepository>;

    fn images(&self) -> Arc<dyn ImageRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled back
    /// on error. Uses ReadCommitted isolation.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get the transaction-scoped employee repository
    pub fn employees(&self) -> TxEmployeeRepository<'_> {
        TxEmployeeRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    role_repo: Arc<RoleStore>,
    reset_token_repo: Arc<ResetTokenStore>,
    company_repo: Arc<CompanyStore>,
    employee_repo: Arc<EmployeeStore>,
    project_repo: Arc<ProjectStore>,
    image_repo: Arc<ImageStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            role_repo: Arc::new(RoleStore::new(db.clone())),
            reset_token_repo: Arc::new(ResetTokenStore::new(db.clone())),
            company_repo: Arc::new(CompanyStore::new(db.clone())),
            employee_repo: Arc::new(EmployeeStore::new(db.clone())),
            project_repo: Arc::new(ProjectStore::new(db.clone())),
            image_repo: Arc::new(ImageStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.role_repo.clone()
    }

    fn reset_tokens(&self) -> Arc<dyn ResetTokenRepository> {
        self.reset_token_repo.clone()
    }

    fn companies(&self) -> Arc<dyn CompanyRepository> {
        self.company_repo.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeRepository> {
        self.employee_repo.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectRepository> {
        self.project_repo.clone()
    }

    fn images(&self) -> Arc<dyn ImageRepository> {
        self.image_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware employee repository.
///
/// Holds the row write and both junction rewrites inside one transaction
/// so a mid-sequence failure leaves no partial assignment state.
pub struct TxEmployeeRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxEmployeeRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert an employee and its company/project assignments
    pub async fn create_with_assignments(
        &self,
        full_name: String,
        position: String,
        company_ids: &[i32],
        project_ids: &[i32],
    ) -> AppResult<Employee> {
        let company_ids = Self::dedup(company_ids);
        let project_ids = Self::dedup(project_ids);
        self.verify_companies_exist(&company_ids).await?;
        self.verify_projects_exist(&project_ids).await?;

        let active_model = employee::ActiveModel {
            full_name: Set(full_name),
            position: Set(position),
            ..Default::default()
        };
        let model = active_model.insert(self.txn).await?;

        self.insert_company_links(model.id, &company_ids).await?;
        self.insert_project_links(model.id, &project_ids).await?;

        Ok(Employee::from(model))
    }

    /// Update an employee and replace its company/project assignments
    pub async fn update_with_assignments(
        &self,
        id: i32,
        full_name: String,
        position: String,
        company_ids: &[i32],
        project_ids: &[i32],
    ) -> AppResult<Employee> {
        let model = employee::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or_else(|| AppError::not_found("Employee"))?;

        let company_ids = Self::dedup(company_ids);
        let project_ids = Self::dedup(project_ids);
        self.verify_companies_exist(&company_ids).await?;
        self.verify_projects_exist(&project_ids).await?;

        let mut active: employee::ActiveModel = model.into();
        active.full_name = Set(full_name);
        active.position = Set(position);
        let model = active.update(self.txn).await?;

        company_employee::Entity::delete_many()
            .filter(company_employee::Column::EmployeeId.eq(id))
            .exec(self.txn)
            .await?;
        employee_project::Entity::delete_many()
            .filter(employee_project::Column::EmployeeId.eq(id))
            .exec(self.txn)
            .await?;

        self.insert_company_links(id, &company_ids).await?;
        self.insert_project_links(id, &project_ids).await?;

        Ok(Employee::from(model))
    }

    fn dedup(ids: &[i32]) -> Vec<i32> {
        ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    async fn verify_companies_exist(&self, ids: &[i32]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = company::Entity::find()
            .filter(company::Column::Id.is_in(ids.to_vec()))
            .count(self.txn)
            .await?;
        if found as usize != ids.len() {
            return Err(AppError::not_found("Company"));
        }
        Ok(())
    }

    async fn verify_projects_exist(&self, ids: &[i32]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = project::Entity::find()
            .filter(project::Column::Id.is_in(ids.to_vec()))
            .count(self.txn)
            .await?;
        if found as usize != ids.len() {
            return Err(AppError::not_found("Project"));
        }
        Ok(())
    }

    async fn insert_company_links(&self, employee_id: i32, company_ids: &[i32]) -> AppResult<()> {
        if company_ids.is_empty() {
            return Ok(());
        }
        let links: Vec<company_employee::ActiveModel> = company_ids
            .iter()
            .map(|&company_id| company_employee::ActiveModel {
                company_id: Set(company_id),
                employee_id: Set(employee_id),
            })
            .collect();
        company_employee::Entity::insert_many(links)
            .exec(self.txn)
            .await?;
        Ok(())
    }

    async fn insert_project_links(&self, employee_id: i32, project_ids: &[i32]) -> AppResult<()> {
        if project_ids.is_empty() {
            return Ok(());
        }
        let links: Vec<employee_project::ActiveModel> = project_ids
            .iter()
            .map(|&project_id| employee_project::ActiveModel {
                employee_id: Set(employee_id),
                project_id: Set(project_id),
            })
            .collect();
        employee_project::Entity::insert_many(links)
            .exec(self.txn)
            .await?;
        Ok(())
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
