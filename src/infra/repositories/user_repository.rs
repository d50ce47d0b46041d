//! User repository - persistence for user accounts and their roles.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{role, user, user_role};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

/// User persistence operations.
///
/// Lockout bookkeeping lives here so callers never mutate the counters
/// directly.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Bump the failed-login counter; the `max_attempts`-th failure locks
    /// the account for `lockout_minutes` and resets the counter.
    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lockout_minutes: i64,
    ) -> AppResult<()>;

    async fn clear_login_failures(&self, id: Uuid) -> AppResult<()>;

    /// Names of all roles the user currently holds, sorted by name
    async fn roles_of(&self, id: Uuid) -> AppResult<Vec<String>>;

    async fn has_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool>;

    async fn add_to_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of `UserRepository`
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            phone_number: Set(new_user.phone_number),
            failed_login_attempts: Set(0),
            lockout_until: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: user::ActiveModel = model.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lockout_minutes: i64,
    ) -> AppResult<()> {
        let Some(model) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        let attempts = model.failed_login_attempts + 1;
        let mut active: user::ActiveModel = model.into();
        if attempts >= max_attempts {
            active.failed_login_attempts = Set(0);
            active.lockout_until = Set(Some(Utc::now() + Duration::minutes(lockout_minutes)));
        } else {
            active.failed_login_attempts = Set(attempts);
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn clear_login_failures(&self, id: Uuid) -> AppResult<()> {
        let Some(model) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        if model.failed_login_attempts == 0 && model.lockout_until.is_none() {
            return Ok(());
        }

        let mut active: user::ActiveModel = model.into();
        active.failed_login_attempts = Set(0);
        active.lockout_until = Set(None);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn roles_of(&self, id: Uuid) -> AppResult<Vec<String>> {
        let role_ids: Vec<Uuid> = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.role_id)
            .collect();

        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let roles = role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await?;

        Ok(roles.into_iter().map(|r| r.name).collect())
    }

    async fn has_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        let count = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn add_to_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        let link = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        };
        link.insert(&self.db).await?;
        Ok(())
    }
}
