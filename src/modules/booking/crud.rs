use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::DbPool;
use crate::modules::booking::interface::{BookingStore, Result};
use crate::modules::booking::model::{Booking, BookingStatus};

pub struct BookingCrud {
    pool: DbPool,
}

impl BookingCrud {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for BookingCrud {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, booking_reference, user_id, booking_type,
                                  flight_id, hotel_id, package_id, cabin_class,
                                  booking_date, flight_date, check_in_date, check_out_date,
                                  adults, children, rooms,
                                  total_amount, tax_amount, final_amount, currency,
                                  status, payment_status, special_requests,
                                  cancellation_reason, cancellation_date,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.booking_reference)
        .bind(&booking.user_id)
        .bind(&booking.booking_type)
        .bind(&booking.flight_id)
        .bind(&booking.hotel_id)
        .bind(&booking.package_id)
        .bind(&booking.cabin_class)
        .bind(booking.booking_date)
        .bind(booking.flight_date)
        .bind(booking.check_in_date)
        .bind(booking.check_out_date)
        .bind(booking.adults)
        .bind(booking.children)
        .bind(booking.rooms)
        .bind(booking.total_amount)
        .bind(booking.tax_amount)
        .bind(booking.final_amount)
        .bind(&booking.currency)
        .bind(&booking.status)
        .bind(&booking.payment_status)
        .bind(&booking.special_requests)
        .bind(&booking.cancellation_reason)
        .bind(booking.cancellation_date)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn mark_cancelled(
        &self,
        id: &str,
        reason: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?, cancellation_reason = ?, cancellation_date = ?, updated_at = ?
            WHERE id = ? AND status <> ?
            "#,
        )
        .bind(BookingStatus::Cancelled.as_str())
        .bind(reason)
        .bind(at)
        .bind(at)
        .bind(id)
        .bind(BookingStatus::Cancelled.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
