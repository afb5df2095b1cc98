use async_trait::async_trait;
use chrono::Utc;

use crate::config::DbPool;
use crate::modules::booking::interface::{InventoryStore, Result};
use crate::modules::catalog::model::{CabinClass, Flight, Hotel, Package};

/// Availability column pair for a flight cabin: (available, total).
fn flight_seat_columns(cabin: CabinClass) -> (&'static str, &'static str) {
    match cabin {
        CabinClass::Economy => ("available_economy_seats", "economy_seats"),
        CabinClass::Business => ("available_business_seats", "business_seats"),
        CabinClass::First => ("available_first_class_seats", "first_class_seats"),
    }
}

pub struct CatalogCrud {
    pool: DbPool,
}

impl CatalogCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Guarded decrement. The WHERE clause keeps the whole check-and-claim
    /// inside one statement, so concurrent claims on the same row cannot
    /// oversell: the row only matches while the counter still covers `units`.
    /// Table and column names are the static identifiers above, never input.
    async fn claim(&self, table: &str, available: &str, id: &str, units: i32) -> Result<bool> {
        let sql = format!(
            "UPDATE {table} SET {available} = {available} - ?, updated_at = ? \
             WHERE id = ? AND {available} >= ?"
        );
        let result = sqlx::query(&sql)
            .bind(units)
            .bind(Utc::now())
            .bind(id)
            .bind(units)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Guarded increment, capped at total capacity so a stray double release
    /// can never report more availability than the resource has.
    async fn release(
        &self,
        table: &str,
        available: &str,
        total: &str,
        id: &str,
        units: i32,
    ) -> Result<bool> {
        let sql = format!(
            "UPDATE {table} SET {available} = {available} + ?, updated_at = ? \
             WHERE id = ? AND {available} + ? <= {total}"
        );
        let result = sqlx::query(&sql)
            .bind(units)
            .bind(Utc::now())
            .bind(id)
            .bind(units)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InventoryStore for CatalogCrud {
    async fn find_flight(&self, id: &str) -> Result<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>("SELECT * FROM flights WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(flight)
    }

    async fn find_hotel(&self, id: &str) -> Result<Option<Hotel>> {
        let hotel = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hotel)
    }

    async fn find_package(&self, id: &str) -> Result<Option<Package>> {
        let package = sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(package)
    }

    async fn claim_flight_seats(&self, id: &str, cabin: CabinClass, units: i32) -> Result<bool> {
        let (available, _) = flight_seat_columns(cabin);
        self.claim("flights", available, id, units).await
    }

    async fn release_flight_seats(&self, id: &str, cabin: CabinClass, units: i32) -> Result<bool> {
        let (available, total) = flight_seat_columns(cabin);
        self.release("flights", available, total, id, units).await
    }

    async fn claim_hotel_rooms(&self, id: &str, units: i32) -> Result<bool> {
        self.claim("hotels", "available_rooms", id, units).await
    }

    async fn release_hotel_rooms(&self, id: &str, units: i32) -> Result<bool> {
        self.release("hotels", "available_rooms", "total_rooms", id, units)
            .await
    }

    async fn claim_package_slots(&self, id: &str, units: i32) -> Result<bool> {
        self.claim("packages", "available_slots", id, units).await
    }

    async fn release_package_slots(&self, id: &str, units: i32) -> Result<bool> {
        self.release("packages", "available_slots", "total_slots", id, units)
            .await
    }
}
