use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use travelbooking::config::{environment::Config, init_db};
use travelbooking::modules::auth::crud::{PasswordResetCrud, UserCrud};
use travelbooking::modules::booking::crud::BookingCrud;
use travelbooking::modules::catalog::CatalogCrud;
use travelbooking::services::jwt::JwtService;
use travelbooking::services::mailer::HttpMailer;
use travelbooking::services::metrics::MetricsRegistry;
use travelbooking::services::rate_limit::RateLimitSettings;
use travelbooking::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travelbooking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url)
        .await
        .expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    let metrics = MetricsRegistry::new().expect("Failed to initialize metrics");

    let state = Arc::new(AppState {
        users: Arc::new(UserCrud::new(db.clone())),
        password_resets: Arc::new(PasswordResetCrud::new(db.clone())),
        inventory: Arc::new(CatalogCrud::new(db.clone())),
        bookings: Arc::new(BookingCrud::new(db.clone())),
        mailer: Arc::new(HttpMailer::new(
            config.mail_api_url,
            config.mail_api_key,
            config.mail_from,
        )),
        jwt_service: JwtService::new(config.jwt_secret),
        metrics,
        limits: RateLimitSettings::from_env(),
        client_url: config.client_url,
    });

    let app = travelbooking::create_app(state).await;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await.unwrap();
}
