pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::auth::auth_routes;
use modules::auth::interface::{PasswordResetRepository, UserRepository};
use modules::booking::booking_routes;
use modules::booking::interface::{BookingStore, InventoryStore};
use modules::metrics::metrics_routes;
use services::jwt::JwtService;
use services::mailer::Mailer;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::rate_limit::{RateLimitLayer, RateLimitSettings};
use services::security::security_headers;

/// Shared application state. Stores and the mailer sit behind trait objects
/// so tests can swap in in-memory implementations.
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub password_resets: Arc<dyn PasswordResetRepository>,
    pub inventory: Arc<dyn InventoryStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_service: JwtService,
    pub metrics: Arc<MetricsRegistry>,
    pub limits: RateLimitSettings,
    pub client_url: String,
}

pub async fn create_app(state: Arc<AppState>) -> Router {
    let general_limit = RateLimitLayer::new(state.limits.general_limiter());
    // Auth endpoints get a tighter second tier on top of the general one.
    let auth_limit = RateLimitLayer::new(state.limits.auth_limiter());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(metrics_routes())
        .nest("/auth", auth_routes().layer(auth_limit))
        .nest("/bookings", booking_routes())
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(general_limit)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            metrics_middleware,
        ))
        .with_state(state)
}

async fn root() -> &'static str {
    "Travel Booking API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
