//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod company;
pub mod company_employee;
pub mod employee;
pub mod employee_project;
pub mod image;
pub mod password_reset_token;
pub mod project;
pub mod role;
pub mod user;
pub mod user_role;
