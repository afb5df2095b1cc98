
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use travelbooking::modules::catalog::model::{Flight, Hotel, Package};
use travelbooking::services::jwt::JwtService;
use travelbooking::services::metrics::MetricsRegistry;
use travelbooking::services::rate_limit::RateLimitSettings;
use travelbooking::AppState;

use memory::{MemoryBookings, MemoryInventory, MemoryResets, MemoryUsers, RecordingMailer};

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub users: Arc<MemoryUsers>,
    pub resets: Arc<MemoryResets>,
    pub inventory: Arc<MemoryInventory>,
    pub bookings: Arc<MemoryBookings>,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: JwtService,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        // Quotas high enough that no test trips them by accident; the rate
        // limit tests build their own context with tight ones.
        Self::with_limits(RateLimitSettings {
            general_burst: 100_000,
            general_per_minute: 100_000,
            auth_burst: 100_000,
            auth_per_minute: 100_000,
        })
        .await
    }

    pub async fn with_limits(limits: RateLimitSettings) -> Self {
        let users = Arc::new(MemoryUsers::default());
        let resets = Arc::new(MemoryResets::default());
        let inventory = Arc::new(MemoryInventory::default());
        let bookings = Arc::new(MemoryBookings::default());
        let mailer = Arc::new(RecordingMailer::default());
        let jwt = JwtService::new("test-secret-key-for-testing-only".to_string());
        let metrics = MetricsRegistry::new().expect("Failed to build metrics registry");

        let state = Arc::new(AppState {
            users: users.clone(),
            password_resets: resets.clone(),
            inventory: inventory.clone(),
            bookings: bookings.clone(),
            mailer: mailer.clone(),
            jwt_service: jwt.clone(),
            metrics,
            limits,
            client_url: "http://localhost:3000".to_string(),
        });

        let app = travelbooking::create_app(state).await;
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            users,
            resets,
            inventory,
            bookings,
            mailer,
            jwt,
        }
    }

    /// Registers an account and returns its bearer token.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "first_name": "Ada",
                "last_name": "Layton",
                "email": email,
                "password": password
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("register token").to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status(StatusCode::OK);

        let body: serde_json::Value = response.json();
        body["token"].as_str().expect("login token").to_string()
    }

    pub fn seed_flight(&self, economy_available: i32) -> String {
        self.seed_flight_priced(economy_available, dec("450.00"))
    }

    pub fn seed_flight_priced(&self, economy_available: i32, economy_price: Decimal) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.inventory.push_flight(Flight {
            id: id.clone(),
            airline: "Aurora Air".to_string(),
            flight_number: "AA102".to_string(),
            departure_airport: "JFK".to_string(),
            arrival_airport: "LHR".to_string(),
            departure_time: now + Duration::days(30),
            arrival_time: now + Duration::days(30) + Duration::hours(7),
            economy_price,
            business_price: dec("1200.00"),
            first_class_price: dec("3400.00"),
            economy_seats: 180,
            business_seats: 24,
            first_class_seats: 8,
            available_economy_seats: economy_available,
            available_business_seats: 24,
            available_first_class_seats: 8,
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_hotel(
        &self,
        nightly: Decimal,
        tax_rate: Decimal,
        total_rooms: i32,
        available_rooms: i32,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.inventory.push_hotel(Hotel {
            id: id.clone(),
            name: "Harborview Hotel".to_string(),
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            price_per_night: nightly,
            tax_rate,
            total_rooms,
            available_rooms,
            star_rating: Some(4),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        id
    }

    pub fn seed_package(
        &self,
        price: Decimal,
        discount_price: Option<Decimal>,
        slots: i32,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        self.inventory.push_package(Package {
            id: id.clone(),
            name: "Andes Trek".to_string(),
            destination: "Peru".to_string(),
            duration_days: 7,
            price,
            discount_price,
            max_travelers: 16,
            total_slots: slots,
            available_slots: slots,
            start_date: now + Duration::days(45),
            end_date: now + Duration::days(52),
            is_active: true,
            created_at: now,
            updated_at: now,
        });
        id
    }
}

// Helper to generate unique test email
#[allow(dead_code)]
pub fn test_email() -> String {
    format!("test_{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}

#[allow(dead_code)]
pub fn dec(raw: &str) -> Decimal {
    raw.parse().expect("decimal literal")
}

/// Amount fields serialize as JSON strings; compare them as decimals so
/// trailing-zero differences do not matter.
#[allow(dead_code)]
pub fn json_dec(value: &serde_json::Value) -> Decimal {
    value
        .as_str()
        .expect("decimal field should be a string")
        .parse()
        .expect("decimal field should parse")
}
