use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::bookingmodel::{Booking, BookingStatus};

#[async_trait]
pub trait BookingExt {
    async fn create_booking(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        visit_date: DateTime<Utc>,
        visit_time: String,
        guest_count: i32,
        special_requests: Option<String>,
    ) -> Result<Booking, sqlx::Error>;

    async fn get_booking_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn get_bookings(
        &self,
        user_id: Option<Uuid>,
        property_id: Option<Uuid>,
        status: Option<BookingStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        admin_id: Uuid,
        admin_notes: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn create_booking(
        &self,
        user_id: Uuid,
        property_id: Uuid,
        visit_date: DateTime<Utc>,
        visit_time: String,
        guest_count: i32,
        special_requests: Option<String>,
    ) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                user_id, property_id, visit_date, visit_time,
                guest_count, special_requests
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .bind(visit_date)
        .bind(visit_time)
        .bind(guest_count)
        .bind(special_requests)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_booking_by_id(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_bookings(
        &self,
        user_id: Option<Uuid>,
        property_id: Option<Uuid>,
        status: Option<BookingStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = (page.max(1) - 1) as i64 * limit as i64;

        let mut builder = QueryBuilder::new("SELECT * FROM bookings WHERE TRUE");
        if let Some(user_id) = user_id {
            builder.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(property_id) = property_id {
            builder.push(" AND property_id = ").push_bind(property_id);
        }
        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit as i64)
            .push(" OFFSET ")
            .push_bind(offset);

        builder
            .build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(BookingStatus::Cancelled)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        status: BookingStatus,
        admin_id: Uuid,
        admin_notes: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $1,
                confirmed_by = CASE WHEN $2 THEN $3 ELSE confirmed_by END,
                admin_notes = COALESCE($4, admin_notes),
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(status == BookingStatus::Confirmed)
        .bind(admin_id)
        .bind(admin_notes)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }
}
