use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Flat tax applied when the resource does not carry its own rate
/// (hotels do, flights and packages do not).
pub fn default_tax_rate() -> Decimal {
    Decimal::from(10)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmountBreakdown {
    pub base_amount: Decimal,
    pub tax_amount: Decimal,
    pub final_amount: Decimal,
}

/// Nights charged for a stay: ceiling of the day difference, minimum one.
/// A 26-hour stay is two nights; a same-day turnaround still bills one.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    ((seconds + 86_399) / 86_400).max(1)
}

pub fn flight_amount(seat_price: Decimal, party_size: i32) -> Decimal {
    seat_price * Decimal::from(party_size)
}

pub fn hotel_amount(price_per_night: Decimal, nights: i64, rooms: i32) -> Decimal {
    price_per_night * Decimal::from(nights) * Decimal::from(rooms)
}

/// Packages are priced per booking, not per traveler; the discount price
/// wins whenever one is set.
pub fn package_amount(price: Decimal, discount_price: Option<Decimal>) -> Decimal {
    discount_price.unwrap_or(price)
}

pub fn breakdown(base: Decimal, tax_rate: Decimal) -> AmountBreakdown {
    let base_amount = base.round_dp(2);
    let tax_amount = (base_amount * tax_rate / Decimal::from(100)).round_dp(2);
    let final_amount = (base_amount + tax_amount).round_dp(2);

    AmountBreakdown {
        base_amount,
        tax_amount,
        final_amount,
    }
}
