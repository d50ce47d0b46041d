//! HTTP request handlers.

pub mod auth_handler;
pub mod company_handler;
pub mod employee_handler;
pub mod project_handler;
pub mod upload_handler;

pub use auth_handler::auth_routes;
pub use company_handler::company_routes;
pub use employee_handler::employee_routes;
pub use project_handler::project_routes;
pub use upload_handler::image_routes;
