use axum::{
    body::Body,
    http::{self, Request, StatusCode},
};
use blog_system::{
    auth::decode_jwt,
    controllers::auth::LoginResponse,
    model::{ApiResponse, ErrorBody, User},
};
use serde_json::json;

use crate::{AppStateTest, DEFAULT_PASSWORD, json_request, read_json};

#[tokio::test]
async fn register_should_be_error_when_body_is_missing() {
    let test_state = AppStateTest::new(false).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_should_be_error_when_field_is_missing() {
    let test_state = AppStateTest::new(false).await;

    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "alice" }),
    );
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_should_be_error_when_body_is_invalid() {
    let test_state = AppStateTest::new(false).await;

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "al", "email": "alice@example.com", "password": "secret1" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.code, 400);
    assert!(body.message.contains("Username length"));

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "alice", "email": "not-an-email", "password": "secret1" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "alice", "email": "alice@example.com", "password": "123" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_should_be_error_when_has_incorrect_type() {
    let test_state = AppStateTest::new(false).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .body(Body::from(
            serde_json::to_vec(&json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "secret1",
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn login_should_be_error_when_fields_are_empty() {
    let test_state = AppStateTest::new(false).await;

    let request = json_request(
        "POST",
        "/api/v1/auth/login",
        json!({ "username": "", "password": "" }),
    );
    let response = test_state.generate_response(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn register_should_create_user() {
    let mut test_state = AppStateTest::new(true).await;

    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "alice", "email": "alice@example.com", "password": "secret1" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResponse<User> = read_json(response).await;
    let user = body.data.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.post_count, 0);

    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
        .fetch_one(&test_state.app_state.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let stored_password: String =
        sqlx::query_scalar(r#"SELECT password FROM users WHERE username = 'alice'"#)
            .fetch_one(&test_state.app_state.pool)
            .await
            .unwrap();
    assert!(stored_password.starts_with("$argon2id$"));

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn register_should_be_conflict_when_username_or_email_is_taken() {
    let mut test_state = AppStateTest::new(true).await;

    let user = test_state.create_user().await;

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": user.username, "email": "other@example.com", "password": "secret1" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.message, "Username already exists");

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/register",
        json!({ "username": "someone_else", "email": user.email, "password": "secret1" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.message, "Email already exists");

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn login_should_return_token_when_credential_is_valid() {
    let mut test_state = AppStateTest::new(true).await;

    let user = test_state.create_user().await;

    let request = json_request(
        "POST",
        "/api/v1/auth/login",
        json!({ "username": user.username, "password": DEFAULT_PASSWORD }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiResponse<LoginResponse> = read_json(response).await;
    let login = body.data.unwrap();
    assert_eq!(login.user.id, user.id);

    let token_data = decode_jwt(&login.token, &test_state.app_state.config.jwt).unwrap();
    assert_eq!(token_data.claims.user_id, user.id);
    assert_eq!(token_data.claims.username, user.username);

    test_state.cleanup().await;
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn login_should_be_unauthorized_when_credential_is_invalid() {
    let mut test_state = AppStateTest::new(true).await;

    let user = test_state.create_user().await;

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/login",
        json!({ "username": user.username, "password": "incorrect-password" }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.message, "Invalid username or password");

    // -----------------------------------------------------------------------
    let request = json_request(
        "POST",
        "/api/v1/auth/login",
        json!({ "username": "nobody", "password": DEFAULT_PASSWORD }),
    );
    let response = test_state.generate_response(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    test_state.cleanup().await;
}
