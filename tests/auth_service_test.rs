//! Authentication flow tests.
//!
//! Drive the real `Authenticator` against in-memory repositories, so the
//! full register / login / role / password-reset lifecycle is exercised
//! without a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use company_api::config::Config;
use company_api::domain::{NewUser, PasswordResetToken, Role, User};
use company_api::errors::{AppError, AppResult};
use company_api::infra::{Mailer, ResetTokenRepository, RoleRepository, UserRepository};
use company_api::services::{AuthService, Authenticator, RegisterUser, TokenIssuer};

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// In-memory credential store
// =============================================================================

#[derive(Clone)]
struct MailRecord {
    to: String,
    body: String,
}

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    roles: Vec<Role>,
    user_roles: Vec<(Uuid, Uuid)>,
    reset_tokens: Vec<PasswordResetToken>,
    next_token_id: i32,
    mails: Vec<MailRecord>,
}

type SharedStore = Arc<Mutex<StoreInner>>;

struct InMemoryUsers {
    store: SharedStore,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.store.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            phone_number: new_user.phone_number,
            failed_login_attempts: 0,
            lockout_until: None,
            created_at: now,
            updated_at: now,
        };
        self.store.lock().unwrap().users.push(user.clone());
        Ok(user)
    }

    async fn set_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn record_login_failure(
        &self,
        id: Uuid,
        max_attempts: i32,
        lockout_minutes: i64,
    ) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        if let Some(user) = store.users.iter_mut().find(|u| u.id == id) {
            let attempts = user.failed_login_attempts + 1;
            if attempts >= max_attempts {
                user.failed_login_attempts = 0;
                user.lockout_until = Some(Utc::now() + Duration::minutes(lockout_minutes));
            } else {
                user.failed_login_attempts = attempts;
            }
        }
        Ok(())
    }

    async fn clear_login_failures(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        if let Some(user) = store.users.iter_mut().find(|u| u.id == id) {
            user.failed_login_attempts = 0;
            user.lockout_until = None;
        }
        Ok(())
    }

    async fn roles_of(&self, id: Uuid) -> AppResult<Vec<String>> {
        let store = self.store.lock().unwrap();
        let mut names: Vec<String> = store
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == id)
            .filter_map(|(_, role_id)| {
                store.roles.iter().find(|r| r.id == *role_id).map(|r| r.name.clone())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    async fn has_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<bool> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .user_roles
            .contains(&(user_id, role_id)))
    }

    async fn add_to_role(&self, user_id: Uuid, role_id: Uuid) -> AppResult<()> {
        self.store.lock().unwrap().user_roles.push((user_id, role_id));
        Ok(())
    }
}

struct InMemoryRoles {
    store: SharedStore,
}

#[async_trait]
impl RoleRepository for InMemoryRoles {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemoryResetTokens {
    store: SharedStore,
}

#[async_trait]
impl ResetTokenRepository for InMemoryResetTokens {
    async fn issue(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<PasswordResetToken> {
        let mut store = self.store.lock().unwrap();
        store
            .reset_tokens
            .retain(|t| t.user_id != user_id || t.consumed_at.is_some());
        store.next_token_id += 1;
        let token = PasswordResetToken {
            id: store.next_token_id,
            user_id,
            token_hash,
            expires_at,
            consumed_at: None,
            created_at: Utc::now(),
        };
        store.reset_tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_hash(
        &self,
        user_id: Uuid,
        token_hash: &str,
    ) -> AppResult<Option<PasswordResetToken>> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .reset_tokens
            .iter()
            .find(|t| t.user_id == user_id && t.token_hash == token_hash)
            .cloned())
    }

    async fn consume(&self, id: i32) -> AppResult<()> {
        let mut store = self.store.lock().unwrap();
        let token = store
            .reset_tokens
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Reset token"))?;
        token.consumed_at = Some(Utc::now());
        Ok(())
    }
}

struct RecordingMailer {
    store: SharedStore,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, _subject: &str, body: &str) -> AppResult<()> {
        self.store.lock().unwrap().mails.push(MailRecord {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// Test helpers
// =============================================================================

fn make_auth(reset_ttl_minutes: i64) -> (Authenticator, SharedStore) {
    let store: SharedStore = Arc::new(Mutex::new(StoreInner::default()));
    {
        let mut inner = store.lock().unwrap();
        inner.roles.push(Role {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
        });
        inner.roles.push(Role {
            id: Uuid::new_v4(),
            name: "User".to_string(),
        });
    }

    let config = Config::from_parts(SECRET, "test-issuer", "test-audience", 60, reset_ttl_minutes);
    let tokens = TokenIssuer::from_config(&config);
    let auth = Authenticator::new(
        Arc::new(InMemoryUsers { store: store.clone() }),
        Arc::new(InMemoryRoles { store: store.clone() }),
        Arc::new(InMemoryResetTokens { store: store.clone() }),
        Arc::new(RecordingMailer { store: store.clone() }),
        tokens,
        config,
    );
    (auth, store)
}

fn alice() -> RegisterUser {
    RegisterUser {
        username: "alice".to_string(),
        email: "alice@x.com".to_string(),
        password: "Passw0rd!".to_string(),
        confirm_password: "Passw0rd!".to_string(),
        phone_number: Some("555-0100".to_string()),
    }
}

fn token_from_mail(body: &str) -> String {
    let start = body.find("token=").expect("mail contains reset link") + "token=".len();
    let rest = &body[start..];
    let end = rest.find('\'').expect("link is quoted");
    rest[..end].to_string()
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_assigns_exactly_the_default_role() {
    let (auth, store) = make_auth(60);

    let user = auth.register(alice()).await.unwrap();

    let inner = store.lock().unwrap();
    assert_eq!(inner.users.len(), 1);
    let role_count = inner
        .user_roles
        .iter()
        .filter(|(user_id, _)| *user_id == user.id)
        .count();
    assert_eq!(role_count, 1);
    drop(inner);

    let roles = InMemoryUsers { store }.roles_of(user.id).await.unwrap();
    assert_eq!(roles, vec!["User".to_string()]);
}

#[tokio::test]
async fn test_register_password_mismatch_creates_no_user() {
    let (auth, store) = make_auth(60);

    let mut input = alice();
    input.confirm_password = "Different1!".to_string();
    let result = auth.register(input).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(store.lock().unwrap().users.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email_is_conflict() {
    let (auth, store) = make_auth(60);

    auth.register(alice()).await.unwrap();

    let mut second = alice();
    second.username = "alice2".to_string();
    let result = auth.register(second).await;

    match result {
        Err(AppError::Conflict(message)) => assert_eq!(message, "Email is already taken"),
        other => panic!("expected conflict, got {:?}", other.map(|u| u.username)),
    }
    assert_eq!(store.lock().unwrap().users.len(), 1);
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let (auth, store) = make_auth(60);

    let mut input = alice();
    input.password = "short".to_string();
    input.confirm_password = "short".to_string();

    assert!(matches!(auth.register(input).await, Err(AppError::Validation(_))));
    assert!(store.lock().unwrap().users.is_empty());
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_by_username_and_email() {
    let (auth, _store) = make_auth(60);
    let user = auth.register(alice()).await.unwrap();

    let by_username = auth.login("alice", "Passw0rd!").await.unwrap();
    let by_email = auth.login("alice@x.com", "Passw0rd!").await.unwrap();

    assert!(!by_username.access_token.is_empty());
    assert_eq!(by_username.token_type, "Bearer");
    assert_eq!(by_username.expires_in, 3600);

    let claims = auth.verify_token(&by_email.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "alice@x.com");
    assert_eq!(claims.roles, vec!["User".to_string()]);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
    let (auth, _store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    let wrong_password = auth.login("alice", "wrong-password").await;
    let unknown_user = auth.login("nobody", "wrong-password").await;

    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
    assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let (auth, _store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    for _ in 0..5 {
        let _ = auth.login("alice", "wrong-password").await;
    }

    // Correct password is now rejected while the lockout window is open
    let locked = auth.login("alice", "Passw0rd!").await;
    assert!(matches!(locked, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_roles_granted_after_login_appear_in_next_token() {
    let (auth, _store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    let first = auth.login("alice", "Passw0rd!").await.unwrap();
    let first_claims = auth.verify_token(&first.access_token).unwrap();
    assert_eq!(first_claims.roles, vec!["User".to_string()]);

    auth.assign_role("alice", "Admin").await.unwrap();

    // The already-issued token is unchanged; the next login carries both roles
    let unchanged = auth.verify_token(&first.access_token).unwrap();
    assert_eq!(unchanged.roles, vec!["User".to_string()]);

    let second = auth.login("alice", "Passw0rd!").await.unwrap();
    let second_claims = auth.verify_token(&second.access_token).unwrap();
    assert_eq!(
        second_claims.roles,
        vec!["Admin".to_string(), "User".to_string()]
    );
}

// =============================================================================
// Role assignment
// =============================================================================

#[tokio::test]
async fn test_assign_role_to_unknown_user_is_not_found() {
    let (auth, store) = make_auth(60);

    let result = auth.assign_role("nobody", "Admin").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(store.lock().unwrap().user_roles.is_empty());
}

#[tokio::test]
async fn test_assign_unknown_role_is_not_found() {
    let (auth, _store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    let result = auth.assign_role("alice", "SuperUser").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_assign_role_is_idempotent() {
    let (auth, store) = make_auth(60);
    let user = auth.register(alice()).await.unwrap();

    auth.assign_role("alice", "Admin").await.unwrap();
    // Re-assigning a held role succeeds and adds nothing
    let message = auth.assign_role("alice", "Admin").await.unwrap();
    assert_eq!(message, "Role Admin assigned to alice.");

    let inner = store.lock().unwrap();
    let role_links = inner
        .user_roles
        .iter()
        .filter(|(user_id, _)| *user_id == user.id)
        .count();
    // The registration's "User" role plus one "Admin" link
    assert_eq!(role_links, 2);
}

// =============================================================================
// Password reset
// =============================================================================

#[tokio::test]
async fn test_reset_request_for_unknown_email_sends_nothing() {
    let (auth, store) = make_auth(60);

    auth.request_password_reset("ghost@x.com").await.unwrap();

    let inner = store.lock().unwrap();
    assert!(inner.mails.is_empty());
    assert!(inner.reset_tokens.is_empty());
}

#[tokio::test]
async fn test_reset_token_is_stored_hashed() {
    let (auth, store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    auth.request_password_reset("alice@x.com").await.unwrap();

    let inner = store.lock().unwrap();
    assert_eq!(inner.mails.len(), 1);
    assert_eq!(inner.mails[0].to, "alice@x.com");

    let raw = token_from_mail(&inner.mails[0].body);
    let stored = &inner.reset_tokens[0].token_hash;
    assert_ne!(&raw, stored);
    // SHA-256 hex digest
    assert_eq!(stored.len(), 64);
    assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_reset_password_end_to_end_and_single_use() {
    let (auth, store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    auth.request_password_reset("alice@x.com").await.unwrap();
    let raw = {
        let inner = store.lock().unwrap();
        token_from_mail(&inner.mails[0].body)
    };

    auth.reset_password("alice@x.com", &raw, "NewPassw0rd!")
        .await
        .unwrap();

    // Old password no longer works, new one does
    assert!(matches!(
        auth.login("alice", "Passw0rd!").await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(auth.login("alice", "NewPassw0rd!").await.is_ok());

    // A consumed token cannot be reused
    let second = auth.reset_password("alice@x.com", &raw, "Another0ne!").await;
    match second {
        Err(AppError::Validation(messages)) => {
            assert!(messages[0].contains("already been used"));
        }
        other => panic!("expected validation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_reset_token_cannot_cross_users() {
    let (auth, store) = make_auth(60);
    auth.register(alice()).await.unwrap();
    auth.register(RegisterUser {
        username: "bob".to_string(),
        email: "bob@x.com".to_string(),
        password: "BobsPass1!".to_string(),
        confirm_password: "BobsPass1!".to_string(),
        phone_number: None,
    })
    .await
    .unwrap();

    auth.request_password_reset("alice@x.com").await.unwrap();
    let alice_token = {
        let inner = store.lock().unwrap();
        token_from_mail(&inner.mails[0].body)
    };

    // Alice's token presented against Bob's account is rejected
    let result = auth
        .reset_password("bob@x.com", &alice_token, "Hijacked1!")
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // Bob's password is unchanged
    assert!(auth.login("bob", "BobsPass1!").await.is_ok());
}

#[tokio::test]
async fn test_expired_reset_token_rejected() {
    let (auth, store) = make_auth(-5);
    auth.register(alice()).await.unwrap();

    auth.request_password_reset("alice@x.com").await.unwrap();
    let raw = {
        let inner = store.lock().unwrap();
        token_from_mail(&inner.mails[0].body)
    };

    let result = auth.reset_password("alice@x.com", &raw, "NewPassw0rd!").await;
    match result {
        Err(AppError::Validation(messages)) => assert!(messages[0].contains("expired")),
        other => panic!("expected validation error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_new_reset_request_supersedes_previous_token() {
    let (auth, store) = make_auth(60);
    auth.register(alice()).await.unwrap();

    auth.request_password_reset("alice@x.com").await.unwrap();
    let first = {
        let inner = store.lock().unwrap();
        token_from_mail(&inner.mails[0].body)
    };

    auth.request_password_reset("alice@x.com").await.unwrap();
    let second = {
        let inner = store.lock().unwrap();
        token_from_mail(&inner.mails[1].body)
    };

    // The first token is gone; only the second works
    assert!(auth
        .reset_password("alice@x.com", &first, "NewPassw0rd!")
        .await
        .is_err());
    assert!(auth
        .reset_password("alice@x.com", &second, "NewPassw0rd!")
        .await
        .is_ok());
}
