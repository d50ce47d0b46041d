//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CompanyService, EmployeeService, ProjectService, ReportService, ServiceContainer,
    Services, UploadService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub company_service: Arc<dyn CompanyService>,
    pub employee_service: Arc<dyn EmployeeService>,
    pub project_service: Arc<dyn ProjectService>,
    pub upload_service: Arc<dyn UploadService>,
    pub report_service: Arc<dyn ReportService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            company_service: container.companies(),
            employee_service: container.employees(),
            project_service: container.projects(),
            upload_service: container.uploads(),
            report_service: container.reports(),
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        company_service: Arc<dyn CompanyService>,
        employee_service: Arc<dyn EmployeeService>,
        project_service: Arc<dyn ProjectService>,
        upload_service: Arc<dyn UploadService>,
        report_service: Arc<dyn ReportService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            company_service,
            employee_service,
            project_service,
            upload_service,
            report_service,
            database,
        }
    }
}
