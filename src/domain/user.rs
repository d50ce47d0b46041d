//! User and role domain entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User domain entity.
///
/// Passwords exist here only as an argon2 hash; the hash is never
/// serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub failed_login_attempts: i32,
    #[serde(skip_serializing)]
    pub lockout_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account is currently locked out
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_until.is_some_and(|until| until > now)
    }
}

/// Data required to create a user record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
}

/// Role reference data, seeded at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_lockout(lockout_until: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "hashed".to_string(),
            phone_number: None,
            failed_login_attempts: 0,
            lockout_until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_lockout_in_future_locks() {
        let user = user_with_lockout(Some(Utc::now() + Duration::minutes(10)));
        assert!(user.is_locked_out(Utc::now()));
    }

    #[test]
    fn test_expired_lockout_unlocks() {
        let user = user_with_lockout(Some(Utc::now() - Duration::minutes(1)));
        assert!(!user.is_locked_out(Utc::now()));
    }

    #[test]
    fn test_no_lockout() {
        let user = user_with_lockout(None);
        assert!(!user.is_locked_out(Utc::now()));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_with_lockout(None);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("username").is_some());
    }
}
