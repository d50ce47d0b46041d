//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod company_repository;
mod employee_repository;
pub(crate) mod entities;
mod image_repository;
mod project_repository;
mod reset_token_repository;
mod role_repository;
mod user_repository;

pub use company_repository::{CompanyRepository, CompanyStore};
pub use employee_repository::{EmployeeRepository, EmployeeStore};
pub use image_repository::{ImageRepository, ImageStore};
pub use project_repository::{ProjectRepository, ProjectStore};
pub use reset_token_repository::{ResetTokenRepository, ResetTokenStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use company_repository::MockCompanyRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use employee_repository::MockEmployeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use image_repository::MockImageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use project_repository::MockProjectRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use reset_token_repository::MockResetTokenRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
