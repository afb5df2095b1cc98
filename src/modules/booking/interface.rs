use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingKind};
use crate::modules::catalog::model::{CabinClass, Flight, Hotel, Package};

// =============================================================================
// STORE TRAITS
// =============================================================================

pub type Result<T> = std::result::Result<T, BookingError>;

/// Read and counter operations over the bookable catalog. Claim/release
/// must be atomic per row: a claim only succeeds when the counter still
/// covers the requested units, a release only when it would not push the
/// counter past total capacity. Both report whether they took effect.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_flight(&self, id: &str) -> Result<Option<Flight>>;
    async fn find_hotel(&self, id: &str) -> Result<Option<Hotel>>;
    async fn find_package(&self, id: &str) -> Result<Option<Package>>;

    async fn claim_flight_seats(&self, id: &str, cabin: CabinClass, units: i32) -> Result<bool>;
    async fn release_flight_seats(&self, id: &str, cabin: CabinClass, units: i32) -> Result<bool>;

    async fn claim_hotel_rooms(&self, id: &str, units: i32) -> Result<bool>;
    async fn release_hotel_rooms(&self, id: &str, units: i32) -> Result<bool>;

    async fn claim_package_slots(&self, id: &str, units: i32) -> Result<bool>;
    async fn release_package_slots(&self, id: &str, units: i32) -> Result<bool>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: &Booking) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>>;
    /// Atomic transition to cancelled; false when the booking was already
    /// cancelled, in which case the caller must not release capacity.
    async fn mark_cancelled(
        &self,
        id: &str,
        reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<bool>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid booking type: {0}")]
    InvalidBookingType(String),

    #[error("{} not found", .0.resource_name())]
    ResourceNotFound(BookingKind),

    #[error("Not enough {} available", .0.capacity_unit())]
    InsufficientCapacity(BookingKind),

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Not authorized to access this booking")]
    NotAuthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BookingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBookingType(_) => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientCapacity(_) => StatusCode::BAD_REQUEST,
            Self::BookingNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyCancelled => StatusCode::BAD_REQUEST,
            Self::NotAuthorized => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
