use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/logout", post(controller::logout))
        .route("/me", get(controller::me))
        .route("/profile", put(controller::update_profile))
        .route("/update-password", put(controller::update_password))
        .route("/forgot-password", post(controller::forgot_password))
        .route("/resend-otp", post(controller::resend_otp))
        .route("/verify-otp", post(controller::verify_otp))
        .route("/reset-password", post(controller::reset_password))
}
