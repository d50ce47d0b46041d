//! Application settings loaded from environment variables.

use std::env;

use crate::errors::{AppError, AppResult};

use super::constants::{
    DEFAULT_APP_BASE_URL, DEFAULT_DATABASE_URL, DEFAULT_RESET_TOKEN_TTL_MINUTES,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_TOKEN_TTL_MINUTES, DEFAULT_UPLOAD_DIR,
    MIN_JWT_SECRET_LENGTH,
};

/// Application configuration.
///
/// Loaded once at startup and injected into services; never read from
/// ambient global state at call time.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_ttl_minutes: i64,
    pub reset_token_ttl_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
    pub app_base_url: String,
    pub upload_dir: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("reset_token_ttl_minutes", &self.reset_token_ttl_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_base_url", &self.app_base_url)
            .field("upload_dir", &self.upload_dir)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing or empty `JWT_SECRET` is a fatal startup condition in
    /// release builds; development builds fall back to an insecure default
    /// with a warning.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => {
                if cfg!(debug_assertions) {
                    tracing::warn!("JWT_SECRET not set, using insecure default for development");
                    "dev-secret-key-minimum-32-characters!!".to_string()
                } else {
                    return Err(AppError::configuration(
                        "JWT_SECRET environment variable must be set",
                    ));
                }
            }
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "company-api".to_string()),
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "company-api-clients".to_string()),
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
            reset_token_ttl_minutes: env::var("RESET_TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RESET_TOKEN_TTL_MINUTES),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Build a configuration directly from parts (used by tests).
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        jwt_secret: impl Into<String>,
        jwt_issuer: impl Into<String>,
        jwt_audience: impl Into<String>,
        token_ttl_minutes: i64,
        reset_token_ttl_minutes: i64,
    ) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_issuer: jwt_issuer.into(),
            jwt_audience: jwt_audience.into(),
            token_ttl_minutes,
            reset_token_ttl_minutes,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
        }
    }
}
