use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

// =============================================================================
// CABIN CLASS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    #[default]
    Economy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl std::fmt::Display for CabinClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CabinClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "economy" => Ok(CabinClass::Economy),
            "business" => Ok(CabinClass::Business),
            "first" => Ok(CabinClass::First),
            other => Err(format!("Unknown cabin class: {}", other)),
        }
    }
}

// =============================================================================
// FLIGHT
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub economy_price: Decimal,
    pub business_price: Decimal,
    pub first_class_price: Decimal,
    pub economy_seats: i32,
    pub business_seats: i32,
    pub first_class_seats: i32,
    pub available_economy_seats: i32,
    pub available_business_seats: i32,
    pub available_first_class_seats: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Flight {
    pub fn seat_price(&self, cabin: CabinClass) -> Decimal {
        match cabin {
            CabinClass::Economy => self.economy_price,
            CabinClass::Business => self.business_price,
            CabinClass::First => self.first_class_price,
        }
    }

    pub fn available_seats(&self, cabin: CabinClass) -> i32 {
        match cabin {
            CabinClass::Economy => self.available_economy_seats,
            CabinClass::Business => self.available_business_seats,
            CabinClass::First => self.available_first_class_seats,
        }
    }

    pub fn total_seats(&self, cabin: CabinClass) -> i32 {
        match cabin {
            CabinClass::Economy => self.economy_seats,
            CabinClass::Business => self.business_seats,
            CabinClass::First => self.first_class_seats,
        }
    }
}

// =============================================================================
// HOTEL
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub price_per_night: Decimal,
    pub tax_rate: Decimal,
    pub total_rooms: i32,
    pub available_rooms: i32,
    pub star_rating: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// PACKAGE
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub duration_days: i32,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    pub max_travelers: i32,
    pub total_slots: i32,
    pub available_slots: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
