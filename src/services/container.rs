//! Service Container - Centralized service access.
//!
//! Wires repositories, file storage, email, and token issuance into the
//! service trait objects consumed by the HTTP layer.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CompanyManager, CompanyService, EmployeeManager, EmployeeService,
    ImageManager, ProjectManager, ProjectService, ReportBuilder, ReportService, TokenIssuer,
    UploadService,
};
use crate::config::Config;
use crate::infra::{FileStore, Mailer, Persistence, SmtpMailer, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn companies(&self) -> Arc<dyn CompanyService>;

    fn employees(&self) -> Arc<dyn EmployeeService>;

    fn projects(&self) -> Arc<dyn ProjectService>;

    fn uploads(&self) -> Arc<dyn UploadService>;

    fn reports(&self) -> Arc<dyn ReportService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    company_service: Arc<dyn CompanyService>,
    employee_service: Arc<dyn EmployeeService>,
    project_service: Arc<dyn ProjectService>,
    upload_service: Arc<dyn UploadService>,
    report_service: Arc<dyn ReportService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let files = FileStore::new(config.upload_dir.clone());
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new());
        let tokens = TokenIssuer::from_config(&config);

        let auth_service = Arc::new(Authenticator::new(
            uow.users(),
            uow.roles(),
            uow.reset_tokens(),
            mailer,
            tokens,
            config,
        ));
        let company_service = Arc::new(CompanyManager::new(uow.companies()));
        let employee_service = Arc::new(EmployeeManager::new(uow.clone(), files.clone()));
        let project_service = Arc::new(ProjectManager::new(uow.projects()));
        let upload_service = Arc::new(ImageManager::new(
            uow.employees(),
            uow.images(),
            files,
        ));
        let report_service = Arc::new(ReportBuilder::new(uow.companies(), uow.employees()));

        Self {
            auth_service,
            company_service,
            employee_service,
            project_service,
            upload_service,
            report_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn companies(&self) -> Arc<dyn CompanyService> {
        self.company_service.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employee_service.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectService> {
        self.project_service.clone()
    }

    fn uploads(&self) -> Arc<dyn UploadService> {
        self.upload_service.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.report_service.clone()
    }
}
