//! Password reset token repository.
//!
//! Rows store only the SHA-256 hash of the token. Issuing a new token
//! supersedes any active token for the same user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::password_reset_token;
use crate::domain::PasswordResetToken;
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    /// Store a new token hash for the user, removing any not-yet-consumed
    /// token the user still has.
    async fn issue(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<PasswordResetToken>;

    /// Look up a token by owner and hash. Scoping the lookup to the owner
    /// is what makes cross-user token replay impossible.
    async fn find_by_hash(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetToken>>;

    /// Mark a token as used
    async fn consume(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of `ResetTokenRepository`
pub struct ResetTokenStore {
    db: DatabaseConnection,
}

impl ResetTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResetTokenRepository for ResetTokenStore {
    async fn issue(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<PasswordResetToken> {
        password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .filter(password_reset_token::Column::ConsumedAt.is_null())
            .exec(&self.db)
            .await?;

        let active_model = password_reset_token::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            consumed_at: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await?;
        Ok(PasswordResetToken::from(model))
    }

    async fn find_by_hash(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetToken>> {
        let result = password_reset_token::Entity::find()
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .filter(password_reset_token::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await?;
        Ok(result.map(PasswordResetToken::from))
    }

    async fn consume(&self, id: i32) -> AppResult<()> {
        let model = password_reset_token::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Reset token"))?;

        let mut active: password_reset_token::ActiveModel = model.into();
        active.consumed_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;
        Ok(())
    }
}
