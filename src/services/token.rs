//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the user id, email, and one
//! role entry per role held at issuance time. A token is an immutable
//! snapshot: role changes after issuance only take effect on the next
//! login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::User;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub jti: Uuid,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

/// Issues and verifies bearer tokens.
///
/// Built once from the immutable startup configuration; signing material
/// is never read from ambient state at call time.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    ttl_minutes: i64,
}

impl TokenIssuer {
    pub fn from_config(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret_bytes().to_vec(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            ttl_minutes: config.token_ttl_minutes,
        }
    }

    /// Sign a token for the user, embedding the given role names.
    ///
    /// Callers must pass the roles as currently stored, not a cached set.
    pub fn issue(&self, user: &User, roles: &[String]) -> AppResult<TokenResponse> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: user.id,
            jti: Uuid::new_v4(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl_minutes * SECONDS_PER_MINUTE,
        })
    }

    /// Verify signature, issuer, audience, and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "hashed".to_string(),
            phone_number: None,
            failed_login_attempts: 0,
            lockout_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn issuer_with(secret: &str, audience: &str, ttl_minutes: i64) -> TokenIssuer {
        TokenIssuer::from_config(&Config::from_parts(
            secret,
            "test-issuer",
            audience,
            ttl_minutes,
            60,
        ))
    }

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let user = test_user();
        let roles = vec!["Admin".to_string(), "User".to_string()];

        let response = issuer.issue(&user, &roles).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert!(!response.access_token.is_empty());

        let claims = issuer.verify(&response.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn test_expiry_is_issued_at_plus_ttl() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let response = issuer.issue(&test_user(), &[]).unwrap();
        let claims = issuer.verify(&response.access_token).unwrap();

        assert_eq!(claims.exp - claims.iat, 60 * SECONDS_PER_MINUTE);
        assert_eq!(response.expires_in, 3600);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let other = issuer_with("another-secret-key-thats-32-chars-long!", "test-audience", 60);

        let response = issuer.issue(&test_user(), &[]).unwrap();
        assert!(other.verify(&response.access_token).is_err());
    }

    #[test]
    fn test_wrong_audience_fails_verification() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let other = issuer_with(SECRET, "other-audience", 60);

        let response = issuer.issue(&test_user(), &[]).unwrap();
        assert!(other.verify(&response.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected_despite_valid_signature() {
        let issuer = issuer_with(SECRET, "test-audience", -5);
        let response = issuer.issue(&test_user(), &[]).unwrap();
        assert!(issuer.verify(&response.access_token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let response = issuer.issue(&test_user(), &[]).unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = response
            .access_token
            .split('.')
            .map(str::to_string)
            .collect();
        let payload = parts[1].clone();
        let flipped = if payload.starts_with('A') { "B" } else { "A" };
        parts[1] = format!("{}{}", flipped, &payload[1..]);
        let tampered = parts.join(".");

        assert!(issuer.verify(&tampered).is_err());
    }

    #[test]
    fn test_no_roles_means_empty_role_claims() {
        let issuer = issuer_with(SECRET, "test-audience", 60);
        let response = issuer.issue(&test_user(), &[]).unwrap();
        let claims = issuer.verify(&response.access_token).unwrap();
        assert!(claims.roles.is_empty());
    }
}
