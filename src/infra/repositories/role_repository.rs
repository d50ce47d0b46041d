//! Role repository - persistence for the role reference table.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::role;
use crate::config::DEFAULT_ROLES;
use crate::domain::Role;
use crate::errors::AppResult;

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Insert the default roles if they are missing. Idempotent.
    async fn seed_defaults(&self) -> AppResult<()>;
}

/// SeaORM-backed implementation of `RoleRepository`
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Role::from))
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        for name in DEFAULT_ROLES {
            if self.find_by_name(name).await?.is_none() {
                let model = role::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set((*name).to_string()),
                };
                model.insert(&self.db).await?;
                tracing::info!(role = name, "Seeded role");
            }
        }
        Ok(())
    }
}
