//! Authentication service - Handles registration, login, role
//! assignment, and the password reset lifecycle.
//!
//! Expected failures (validation, conflicts, unknown users) are returned
//! as structured errors; only infrastructure failures surface as 500s.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::distr::Alphanumeric;
use rand::{rng, Rng};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::config::{
    Config, LOCKOUT_DURATION_MINUTES, LOCKOUT_MAX_FAILED_ATTEMPTS, RESET_TOKEN_LENGTH, ROLE_USER,
};
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{Mailer, ResetTokenRepository, RoleRepository, UserRepository};

use super::token::{Claims, TokenIssuer, TokenResponse};

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and assign the default role
    async fn register(&self, input: RegisterUser) -> AppResult<User>;

    /// Login and return a bearer token carrying all currently held roles
    async fn login(&self, username_or_email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Add a role to a user. Idempotent: re-assigning a held role succeeds.
    async fn assign_role(&self, username: &str, role_name: &str) -> AppResult<String>;

    /// Generate and email a reset token. Unknown emails are a silent no-op
    /// so the endpoint cannot be used to enumerate accounts.
    async fn request_password_reset(&self, email: &str) -> AppResult<()>;

    /// Consume a reset token and replace the password hash
    async fn reset_password(&self, email: &str, token: &str, new_password: &str) -> AppResult<()>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate a random reset token (64 alphanumeric chars)
fn generate_reset_token() -> String {
    rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// SHA-256 hash a reset token for storage
fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    reset_tokens: Arc<dyn ResetTokenRepository>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenIssuer,
    config: Config,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        reset_tokens: Arc<dyn ResetTokenRepository>,
        mailer: Arc<dyn Mailer>,
        tokens: TokenIssuer,
        config: Config,
    ) -> Self {
        Self {
            users,
            roles,
            reset_tokens,
            mailer,
            tokens,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, input: RegisterUser) -> AppResult<User> {
        if input.password != input.confirm_password {
            return Err(AppError::validation("Passwords do not match"));
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email is already taken"));
        }

        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(AppError::conflict("Username is already taken"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .users
            .create(NewUser {
                username: input.username,
                email: input.email,
                phone_number: input.phone_number,
                password_hash,
            })
            .await?;

        let default_role = self
            .roles
            .find_by_name(ROLE_USER)
            .await?
            .ok_or_else(|| AppError::internal("Default role is not seeded"))?;
        self.users.add_to_role(user.id, default_role.id).await?;

        tracing::info!(user = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username_or_email: &str, password: &str) -> AppResult<TokenResponse> {
        let user = match self.users.find_by_email(username_or_email).await? {
            Some(user) => Some(user),
            None => self.users.find_by_username(username_or_email).await?,
        };

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid accounts.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(dummy_hash);
        let password_valid = Password::from_hash(stored_hash.to_string()).verify(password);

        // The response never distinguishes unknown account, wrong password,
        // or an active lockout.
        let Some(user) = user else {
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked_out(Utc::now()) {
            tracing::warn!(user = %user.username, "Login attempt on locked account");
            return Err(AppError::InvalidCredentials);
        }

        if !password_valid {
            self.users
                .record_login_failure(user.id, LOCKOUT_MAX_FAILED_ATTEMPTS, LOCKOUT_DURATION_MINUTES)
                .await?;
            return Err(AppError::InvalidCredentials);
        }

        self.users.clear_login_failures(user.id).await?;

        // Roles are read fresh at every login; a role granted after a
        // token was issued only shows up in the next token.
        let roles = self.users.roles_of(user.id).await?;
        self.tokens.issue(&user, &roles)
    }

    async fn assign_role(&self, username: &str, role_name: &str) -> AppResult<String> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let role = self
            .roles
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| AppError::not_found("Role"))?;

        if !self.users.has_role(user.id, role.id).await? {
            self.users.add_to_role(user.id, role.id).await?;
            tracing::info!(user = %username, role = %role_name, "Role assigned");
        }

        Ok(format!("Role {} assigned to {}.", role_name, username))
    }

    async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(self.config.reset_token_ttl_minutes);
        self.reset_tokens
            .issue(user.id, hash_reset_token(&token), expires_at)
            .await?;

        let reset_link = format!(
            "{}/api/auth/ResetPasswordPage?email={}&token={}",
            self.config.app_base_url, user.email, token
        );
        let body = format!(
            "Click <a href='{}'>here</a> to reset your password.",
            reset_link
        );
        self.mailer
            .send(&user.email, "Password Reset Request", &body)
            .await
    }

    async fn reset_password(&self, email: &str, token: &str, new_password: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::validation("Invalid email"))?;

        // Lookup is scoped to this user's rows, so a token issued for
        // another account can never match.
        let record = self
            .reset_tokens
            .find_by_hash(user.id, &hash_reset_token(token))
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired reset token"))?;

        if record.is_consumed() {
            return Err(AppError::validation("Reset token has already been used"));
        }
        if record.is_expired(Utc::now()) {
            return Err(AppError::validation("Reset token has expired"));
        }

        let password_hash = Password::new(new_password)?.into_string();
        self.users.set_password_hash(user.id, password_hash).await?;
        self.users.clear_login_failures(user.id).await?;
        self.reset_tokens.consume(record.id).await?;

        tracing::info!(user = %user.username, "Password reset completed");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.verify(token)
    }
}
