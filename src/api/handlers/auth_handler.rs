//! Authentication handlers.

use axum::{extract::State, middleware, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, require_admin_middleware};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{RegisterUser, TokenResponse};
use crate::types::MessageResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Must match `password`
    #[schema(example = "SecurePass123!")]
    pub confirm_password: String,
    /// Optional phone number
    #[schema(example = "555-0100")]
    pub phone_number: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address
    #[validate(length(min = 1, message = "Username or email is required"))]
    #[schema(example = "alice")]
    pub username_or_email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Role assignment request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Role is required"))]
    #[schema(example = "Admin")]
    pub role: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// Password reset completion request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// The token delivered by the reset email
    pub token: String,
    /// New password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "NewSecurePass123!", min_length = 8)]
    pub new_password: String,
}

/// Create authentication routes.
///
/// Role assignment is bearer-protected and admin-gated; the policy check
/// runs before the handler.
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/assign-role", post(assign_role))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/RequestPasswordReset", post(request_password_reset))
        .route("/ResetPassword", post(reset_password))
        .merge(admin_only)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Validation error or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .register(RegisterUser {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            confirm_password: payload.confirm_password,
            phone_number: payload.phone_number,
        })
        .await?;

    Ok(Json(MessageResponse::new("User registered successfully!")))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(&payload.username_or_email, &payload.password)
        .await?;

    Ok(Json(token))
}

/// Assign a role to a user (admin only)
#[utoipa::path(
    post,
    path = "/api/auth/assign-role",
    tag = "Authentication",
    request_body = AssignRoleRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role assigned", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User or role not found")
    )
)]
pub async fn assign_role(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AssignRoleRequest>,
) -> AppResult<Json<MessageResponse>> {
    let message = state
        .auth_service
        .assign_role(&payload.username, &payload.role)
        .await?;

    Ok(Json(MessageResponse::new(message)))
}

/// Request a password reset email.
///
/// The response shape is identical whether or not the email is
/// registered, so the endpoint cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/api/auth/RequestPasswordReset",
    tag = "Authentication",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset requested", body = MessageResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "If the email exists, a password reset link has been sent.",
    )))
}

/// Complete a password reset
#[utoipa::path(
    post,
    path = "/api/auth/ResetPassword",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Invalid, expired, or already-used token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .reset_password(&payload.email, &payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully.",
    )))
}
