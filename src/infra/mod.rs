//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Unit of Work for transaction management
//! - Local file storage for uploads
//! - Email dispatch

pub mod db;
pub mod email;
pub mod files;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use email::{Mailer, SmtpMailer};
pub use files::FileStore;
pub use repositories::{
    CompanyRepository, CompanyStore, EmployeeRepository, EmployeeStore, ImageRepository,
    ImageStore, ProjectRepository, ProjectStore, ResetTokenRepository, ResetTokenStore,
    RoleRepository, RoleStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxEmployeeRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCompanyRepository, MockEmployeeRepository, MockImageRepository, MockProjectRepository,
    MockResetTokenRepository, MockRoleRepository, MockUserRepository,
};
