//! API surface tests.
//!
//! Validate the HTTP-facing contracts that do not need a database: error
//! status mapping and body shape, response serialization, list query
//! parsing, and the admin policy check.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;
use uuid::Uuid;

use company_api::api::middleware::CurrentUser;
use company_api::errors::AppError;
use company_api::types::{ListQuery, MessageResponse, Paginated};

async fn response_json(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_invalid_credentials_is_401() {
    let (status, body) = response_json(AppError::InvalidCredentials).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_forbidden_is_403() {
    let (status, body) = response_json(AppError::Forbidden).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["statusCode"], 403);
}

#[tokio::test]
async fn test_not_found_is_404_with_entity_message() {
    let (status, body) = response_json(AppError::not_found("Role")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Role not found");
}

#[tokio::test]
async fn test_duplicate_email_is_400_with_error_list() {
    let (status, body) = response_json(AppError::conflict("Email is already taken")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email is already taken");
    assert_eq!(body["errors"][0], "Email is already taken");
}

#[tokio::test]
async fn test_validation_lists_every_message() {
    let error = AppError::validation_list(vec![
        "Passwords do not match".to_string(),
        "Username is required".to_string(),
    ]);
    let (status, body) = response_json(error).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_internal_error_is_opaque() {
    let (status, body) = response_json(AppError::internal("secret stack trace")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("secret stack trace"));
}

// =============================================================================
// Response serialization
// =============================================================================

#[test]
fn test_paginated_meta_uses_camel_case() {
    let page = Paginated::new(vec!["a", "b"], 1, 10, 12);
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["meta"]["pageSize"], 10);
    assert_eq!(json["meta"]["totalPages"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[test]
fn test_message_response_shape() {
    let json = serde_json::to_value(MessageResponse::new("User registered successfully!")).unwrap();
    assert_eq!(json["message"], "User registered successfully!");
}

// =============================================================================
// List query parsing
// =============================================================================

#[test]
fn test_list_query_defaults() {
    let query: ListQuery = serde_json::from_str("{}").unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.page_size, 10);
    assert!(query.search_term.is_none());
    assert!(!query.sort_dir.is_descending());
}

// =============================================================================
// Role policy
// =============================================================================

#[test]
fn test_current_user_admin_check() {
    let admin = CurrentUser {
        id: Uuid::new_v4(),
        email: "admin@x.com".to_string(),
        roles: vec!["Admin".to_string(), "User".to_string()],
    };
    let user = CurrentUser {
        id: Uuid::new_v4(),
        email: "user@x.com".to_string(),
        roles: vec!["User".to_string()],
    };

    assert!(admin.is_admin());
    assert!(!user.is_admin());
}
