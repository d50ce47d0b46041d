//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
mod company_service;
pub mod container;
mod employee_service;
mod project_service;
mod report_service;
mod token;
mod upload_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, RegisterUser};
pub use company_service::{CompanyManager, CompanyService};
pub use employee_service::{EmployeeInput, EmployeeManager, EmployeeService};
pub use project_service::{ProjectInput, ProjectManager, ProjectService};
pub use report_service::{ReportBuilder, ReportService};
pub use token::{Claims, TokenIssuer, TokenResponse};
pub use upload_service::{ImageManager, UploadService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
