use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use travelbooking::services::mailer::template;

use crate::common::{dec, test_email, test_password, TestContext};

async fn create_flight_booking(ctx: &TestContext, token: &str, flight_id: &str) -> String {
    let response = ctx
        .server
        .post("/bookings")
        .authorization_bearer(token)
        .json(&json!({
            "booking_type": "flight",
            "flight_id": flight_id,
            "flight_date": (Utc::now() + Duration::days(30)).to_rfc3339(),
            "adults": 2,
            "children": 1
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["booking"]["id"].as_str().expect("booking id").to_string()
}

#[tokio::test]
async fn cancelling_restores_flight_capacity() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &token, &flight_id).await;

    assert_eq!(
        ctx.inventory.flight(&flight_id).unwrap().available_economy_seats,
        2
    );

    let response = ctx
        .server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({ "reason": "Change of plans" }))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Booking cancelled successfully");
    assert_eq!(body["booking"]["status"], "cancelled");
    assert_eq!(body["booking"]["cancellation_reason"], "Change of plans");
    assert!(body["booking"].get("cancellation_date").is_some());

    assert_eq!(
        ctx.inventory.flight(&flight_id).unwrap().available_economy_seats,
        5
    );

    let notice = ctx
        .mailer
        .last_for_template(template::BOOKING_CANCELLATION)
        .expect("cancellation email");
    assert_eq!(notice.to, email);
    assert_eq!(notice.vars["reason"], "Change of plans");
}

#[tokio::test]
async fn cancel_without_reason_uses_the_default_note() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &token, &flight_id).await;

    let response = ctx
        .server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert!(body["booking"].get("cancellation_reason").is_none());

    let notice = ctx
        .mailer
        .last_for_template(template::BOOKING_CANCELLATION)
        .expect("cancellation email");
    assert_eq!(notice.vars["reason"], "Cancelled by customer");
}

#[tokio::test]
async fn double_cancel_is_rejected_without_double_release() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &token, &flight_id).await;

    ctx.server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::OK);

    let response = ctx
        .server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Booking is already cancelled");

    // Seats were released exactly once.
    assert_eq!(
        ctx.inventory.flight(&flight_id).unwrap().available_economy_seats,
        5
    );
}

#[tokio::test]
async fn stranger_cannot_view_or_cancel_a_booking() {
    let ctx = TestContext::new().await;
    let owner_email = test_email();
    let owner_token = ctx.register(&owner_email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &owner_token, &flight_id).await;

    let stranger_token = ctx.register(&test_email(), test_password()).await;

    let response = ctx
        .server
        .get(&format!("/bookings/{}", booking_id))
        .authorization_bearer(&stranger_token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&stranger_token)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not authorized to access this booking");

    // Still booked.
    assert_eq!(
        ctx.inventory.flight(&flight_id).unwrap().available_economy_seats,
        2
    );
}

#[tokio::test]
async fn staff_can_cancel_another_users_booking() {
    let ctx = TestContext::new().await;
    let owner_email = test_email();
    let owner_token = ctx.register(&owner_email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &owner_token, &flight_id).await;

    let admin_email = test_email();
    let admin_token = ctx.register(&admin_email, test_password()).await;
    ctx.users.set_role(&admin_email, "admin");

    let response = ctx
        .server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&admin_token)
        .json(&json!({ "reason": "Flight schedule change" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["booking"]["status"], "cancelled");

    assert_eq!(
        ctx.inventory.flight(&flight_id).unwrap().available_economy_seats,
        5
    );
}

#[tokio::test]
async fn cancelling_a_hotel_booking_restores_rooms() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let hotel_id = ctx.seed_hotel(dec("100.00"), dec("10.00"), 10, 10);
    let now = Utc::now();

    let response = ctx
        .server
        .post("/bookings")
        .authorization_bearer(&token)
        .json(&json!({
            "booking_type": "hotel",
            "hotel_id": &hotel_id,
            "check_in_date": (now + Duration::days(10)).to_rfc3339(),
            "check_out_date": (now + Duration::days(12)).to_rfc3339(),
            "rooms": 3
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    assert_eq!(ctx.inventory.hotel(&hotel_id).unwrap().available_rooms, 7);

    ctx.server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.inventory.hotel(&hotel_id).unwrap().available_rooms, 10);
}

#[tokio::test]
async fn cancelling_a_package_booking_restores_slots() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let package_id = ctx.seed_package(dec("1500.00"), None, 8);

    let response = ctx
        .server
        .post("/bookings")
        .authorization_bearer(&token)
        .json(&json!({
            "booking_type": "package",
            "package_id": &package_id,
            "adults": 2,
            "children": 2
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    assert_eq!(ctx.inventory.package(&package_id).unwrap().available_slots, 4);

    ctx.server
        .put(&format!("/bookings/{}/cancel", booking_id))
        .authorization_bearer(&token)
        .json(&json!({}))
        .await
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.inventory.package(&package_id).unwrap().available_slots, 8);
}

#[tokio::test]
async fn cancel_unknown_booking_returns_not_found() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;

    let response = ctx
        .server
        .put("/bookings/no-such-booking/cancel")
        .authorization_bearer(&token)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Booking not found");
}

#[tokio::test]
async fn owner_can_fetch_a_booking() {
    let ctx = TestContext::new().await;
    let email = test_email();
    let token = ctx.register(&email, test_password()).await;
    let flight_id = ctx.seed_flight(5);
    let booking_id = create_flight_booking(&ctx, &token, &flight_id).await;

    let response = ctx
        .server
        .get(&format!("/bookings/{}", booking_id))
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], booking_id);
    assert_eq!(body["booking_type"], "flight");
    assert_eq!(body["flight_id"], flight_id);

    let response = ctx
        .server
        .get("/bookings/no-such-booking")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
