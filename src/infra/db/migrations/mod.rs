//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_roles_tables;
mod m20250302_000001_create_company_tables;
mod m20250310_000001_create_images_table;
mod m20250315_000001_add_profile_picture_to_employees;
mod m20250320_000001_create_password_reset_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_roles_tables::Migration),
            Box::new(m20250302_000001_create_company_tables::Migration),
            Box::new(m20250310_000001_create_images_table::Migration),
            Box::new(m20250315_000001_add_profile_picture_to_employees::Migration),
            Box::new(m20250320_000001_create_password_reset_tokens::Migration),
        ]
    }
}
