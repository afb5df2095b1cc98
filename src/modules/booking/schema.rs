use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Booking;

fn default_adults() -> i32 {
    1
}

fn default_rooms() -> i32 {
    1
}

// =============================================================================
// CREATE BOOKING
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// "flight" | "hotel" | "package"; kept as a string so an unknown
    /// discriminator reaches the flow as InvalidBookingType instead of a
    /// deserializer rejection.
    pub booking_type: String,

    pub flight_id: Option<String>,
    pub hotel_id: Option<String>,
    pub package_id: Option<String>,

    /// Flights only: "economy" | "business" | "first", default economy.
    pub cabin_class: Option<String>,

    pub flight_date: Option<DateTime<Utc>>,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,

    #[serde(default = "default_adults")]
    #[validate(range(min = 1, max = 10, message = "Adults must be between 1 and 10"))]
    pub adults: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 10, message = "Children must be between 0 and 10"))]
    pub children: i32,

    #[serde(default = "default_rooms")]
    #[validate(range(min = 1, max = 10, message = "Rooms must be between 1 and 10"))]
    pub rooms: i32,

    #[validate(length(max = 500, message = "Special requests must be at most 500 characters"))]
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub booking: BookingResponse,
}

// =============================================================================
// CANCEL BOOKING
// =============================================================================

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CancelBookingResponse {
    pub message: &'static str,
    pub booking: BookingResponse,
}

// =============================================================================
// BOOKING VIEW
// =============================================================================

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub booking_reference: String,
    pub user_id: String,
    pub booking_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<String>,
    pub booking_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<DateTime<Utc>>,
    pub adults: i32,
    pub children: i32,
    pub rooms: i32,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub final_amount: Decimal,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_reference: booking.booking_reference,
            user_id: booking.user_id,
            booking_type: booking.booking_type,
            flight_id: booking.flight_id,
            hotel_id: booking.hotel_id,
            package_id: booking.package_id,
            cabin_class: booking.cabin_class,
            booking_date: booking.booking_date,
            flight_date: booking.flight_date,
            check_in_date: booking.check_in_date,
            check_out_date: booking.check_out_date,
            adults: booking.adults,
            children: booking.children,
            rooms: booking.rooms,
            total_amount: booking.total_amount,
            tax_amount: booking.tax_amount,
            final_amount: booking.final_amount,
            currency: booking.currency,
            status: booking.status,
            payment_status: booking.payment_status,
            special_requests: booking.special_requests,
            cancellation_reason: booking.cancellation_reason,
            cancellation_date: booking.cancellation_date,
            created_at: booking.created_at,
        }
    }
}
