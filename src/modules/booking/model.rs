use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

use crate::modules::catalog::model::CabinClass;

// =============================================================================
// BOOKING TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingKind {
    Flight,
    Hotel,
    Package,
}

impl BookingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingKind::Flight => "flight",
            BookingKind::Hotel => "hotel",
            BookingKind::Package => "package",
        }
    }

    /// Capitalized resource name for user-facing messages.
    pub fn resource_name(&self) -> &'static str {
        match self {
            BookingKind::Flight => "Flight",
            BookingKind::Hotel => "Hotel",
            BookingKind::Package => "Package",
        }
    }

    /// The unit the resource's availability is counted in.
    pub fn capacity_unit(&self) -> &'static str {
        match self {
            BookingKind::Flight => "seats",
            BookingKind::Hotel => "rooms",
            BookingKind::Package => "slots",
        }
    }
}

impl std::fmt::Display for BookingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flight" => Ok(BookingKind::Flight),
            "hotel" => Ok(BookingKind::Hotel),
            "package" => Ok(BookingKind::Package),
            other => Err(format!("Unknown booking type: {}", other)),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Refunded,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Failed => "failed",
        }
    }
}

// =============================================================================
// BOOKING
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub booking_reference: String,
    pub user_id: String,
    pub booking_type: String,
    pub flight_id: Option<String>,
    pub hotel_id: Option<String>,
    pub package_id: Option<String>,
    pub cabin_class: Option<String>,
    pub booking_date: DateTime<Utc>,
    pub flight_date: Option<DateTime<Utc>>,
    pub check_in_date: Option<DateTime<Utc>>,
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
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancellation_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const REFERENCE_SUFFIX_LEN: usize = 6;

impl Booking {
    /// "TB" plus six random uppercase alphanumerics, e.g. TB4K9XQ2.
    pub fn generate_reference() -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..REFERENCE_SUFFIX_LEN)
            .map(|_| REFERENCE_CHARSET[rng.random_range(0..REFERENCE_CHARSET.len())] as char)
            .collect();
        format!("TB{}", suffix)
    }

    pub fn kind(&self) -> Option<BookingKind> {
        BookingKind::from_str(&self.booking_type).ok()
    }

    pub fn cabin(&self) -> CabinClass {
        self.cabin_class
            .as_deref()
            .and_then(|c| CabinClass::from_str(c).ok())
            .unwrap_or_default()
    }

    /// Travelers occupying flight seats or package slots.
    pub fn party_size(&self) -> i32 {
        self.adults + self.children
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled.as_str()
    }
}
