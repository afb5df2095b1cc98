use axum::http::StatusCode;
use serde_json::json;

use travelbooking::services::mailer::template;

use crate::common::{test_email, test_password, TestContext};

/// Runs the front half of the flow (request + verify) and returns the
/// reset credential the API hands back.
async fn obtain_reset_token(ctx: &TestContext, email: &str) -> String {
    ctx.server
        .post("/auth/forgot-password")
        .json(&json!({ "email": email }))
        .await
        .assert_status(StatusCode::OK);

    let otp = ctx.resets.latest_otp(email).expect("OTP issued");

    let response = ctx
        .server
        .post("/auth/verify-otp")
        .json(&json!({ "email": email, "otp": otp }))
        .await;
    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    body["reset_token"].as_str().expect("reset token").to_string()
}

#[tokio::test]
async fn full_reset_journey_swaps_the_password() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;
    let token = obtain_reset_token(&ctx, &email).await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": "BrandNewPassword456!"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Password has been reset successfully");

    // Old password is dead, the new one works.
    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": "BrandNewPassword456!" }))
        .await
        .assert_status(StatusCode::OK);

    let notice = ctx
        .mailer
        .last_for_template(template::PASSWORD_CHANGED)
        .expect("change notice");
    assert_eq!(notice.to, email);
}

#[tokio::test]
async fn reset_credential_is_single_use() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;
    let token = obtain_reset_token(&ctx, &email).await;

    ctx.server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": "BrandNewPassword456!"
        }))
        .await
        .assert_status(StatusCode::OK);

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": "AnotherPassword789!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or expired reset token");

    // The replay did not touch the password set by the first reset.
    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": "BrandNewPassword456!" }))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": "not-a-real-token",
            "new_password": "BrandNewPassword456!"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or expired reset token");
}

#[tokio::test]
async fn access_token_cannot_reset_a_password() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let access_token = ctx.register(&email, test_password()).await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &access_token,
            "new_password": "BrandNewPassword456!"
        }))
        .await;

    // Signed with the same secret, but the purpose claim does not match.
    response.assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post("/auth/login")
        .json(&json!({ "email": &email, "password": test_password() }))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn reusing_the_current_password_is_rejected() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;
    let token = obtain_reset_token(&ctx, &email).await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "New password must be different from the current password"
    );

    // The rejection happens before the credential is consumed, so the
    // user can retry with a genuinely new password.
    ctx.server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": "BrandNewPassword456!"
        }))
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn weak_new_password_fails_validation() {
    let ctx = TestContext::new().await;
    let email = test_email();
    ctx.register(&email, test_password()).await;
    let token = obtain_reset_token(&ctx, &email).await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({
            "reset_token": &token,
            "new_password": "weak"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({ "new_password": "BrandNewPassword456!" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = ctx
        .server
        .post("/auth/reset-password")
        .json(&json!({ "reset_token": "some-token" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
