use axum::http::StatusCode;
use serde_json::json;

use travelbooking::services::mailer::template;
use travelbooking::services::rate_limit::RateLimitSettings;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn register_with_valid_data_returns_created() {
    let ctx = TestContext::new().await;
    let email = test_email();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], email.as_str());
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // Welcome email goes out on successful registration
    let welcome = ctx
        .mailer
        .last_for_template(template::WELCOME)
        .expect("welcome email");
    assert_eq!(welcome.to, email);
}

#[tokio::test]
async fn register_with_existing_email_returns_conflict() {
    let ctx = TestContext::new().await;
    let email = test_email();

    ctx.register(&email, test_password()).await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": &email,
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn register_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": "not-an-email",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn register_with_short_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email(),
            "password": "weak"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_bad_phone_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email(),
            "password": test_password(),
            "phone": "12ab"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_with_missing_fields_returns_unprocessable() {
    let ctx = TestContext::new().await;

    // Missing email
    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "password": test_password()
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Missing password
    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email()
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_succeeds_even_when_welcome_email_fails() {
    let ctx = TestContext::new().await;
    ctx.mailer.set_failing(true);

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    // The welcome email is best-effort; account creation must not depend
    // on the mail provider.
    response.assert_status(StatusCode::CREATED);
    assert_eq!(ctx.mailer.template_count(template::WELCOME), 0);
}

// =============================================================================
// RATE LIMITING
// =============================================================================

#[tokio::test]
async fn auth_tier_rate_limits_after_burst() {
    let ctx = TestContext::with_limits(RateLimitSettings {
        general_burst: 100_000,
        general_per_minute: 100_000,
        auth_burst: 3,
        auth_per_minute: 1,
    })
    .await;

    for _ in 0..3 {
        ctx.server
            .post("/auth/login")
            .json(&json!({ "email": test_email(), "password": "whatever1" }))
            .await;
    }

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "email": test_email(), "password": "whatever1" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn auth_tier_does_not_throttle_other_routes() {
    let ctx = TestContext::with_limits(RateLimitSettings {
        general_burst: 100_000,
        general_per_minute: 100_000,
        auth_burst: 2,
        auth_per_minute: 1,
    })
    .await;

    for _ in 0..2 {
        ctx.server
            .post("/auth/login")
            .json(&json!({ "email": test_email(), "password": "whatever1" }))
            .await;
    }

    // Auth tier exhausted, but the health endpoint only sits behind the
    // general tier.
    let response = ctx.server.get("/health").await;
    response.assert_status(StatusCode::OK);
}

// =============================================================================
// SECURITY
// =============================================================================

#[tokio::test]
async fn register_response_includes_security_headers() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email(),
            "password": test_password()
        }))
        .await;

    assert!(response.headers().get("x-content-type-options").is_some());
    assert!(response.headers().get("x-frame-options").is_some());
}

#[tokio::test]
async fn register_rejects_oversized_payload() {
    let ctx = TestContext::new().await;

    let large_password = "a".repeat(1_000_000);

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "first_name": "Ada",
            "last_name": "Layton",
            "email": test_email(),
            "password": &large_password
        }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}
