use axum::http::StatusCode;
use serde_json::json;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": "WrongPassword123!"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_with_unknown_email_uses_the_same_error() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "nonexistent@example.com",
            "password": test_password()
        }))
        .await;

    // Same status and message as a wrong password, so the endpoint does
    // not reveal which accounts exist.
    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_on_deactivated_account_returns_unauthorized() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;
    ctx.users.deactivate(&email);

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Account is deactivated");
}

#[tokio::test]
async fn login_with_missing_fields_returns_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "password": test_password() }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": test_email() }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_records_last_login() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;

    assert!(ctx.users.get_by_email(&email).unwrap().last_login.is_none());

    ctx.login(&email, test_password()).await;

    assert!(ctx.users.get_by_email(&email).unwrap().last_login.is_some());
}

#[tokio::test]
async fn login_returns_different_tokens_each_time() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;

    let first = ctx.login(&email, test_password()).await;
    let second = ctx.login(&email, test_password()).await;

    assert_ne!(first, second);
}
