use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn booking_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(controller::create_booking))
        .route("/{id}", get(controller::get_booking))
        .route("/{id}/cancel", put(controller::cancel_booking))
}
