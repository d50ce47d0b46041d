//! Password reset token record.
//!
//! Only a SHA-256 hash of the token is ever stored; the raw token lives
//! solely in the reset email.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stored password reset token state.
///
/// Single-use and time-boxed: `consumed_at` is set on successful reset,
/// and a new request for the same user supersedes any active token.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: i32,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Whether the token is past its expiry
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Whether the token has already been used
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}
