/// Booking repository
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use super::BookingStore;
use crate::error::{AppError, Result};

pub struct BookingRepo {
    pool: PgPool,
}

impl BookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Booking owners are auth user UUIDs; any casing is accepted
pub fn parse_booking_user(user_id: &str) -> Option<Uuid> {
    Uuid::parse_str(user_id.trim()).ok()
}

#[async_trait]
impl BookingStore for BookingRepo {
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<i64>> {
        let Some(owner) = parse_booking_user(user_id) else {
            debug!(user_id = %user_id, "Malformed user id, no bookings possible");
            return Ok(Vec::new());
        };

        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT hotel_id::BIGINT
            FROM bookings
            WHERE user_id = $1
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get bookings for user {}: {}", owner, e);
            AppError::Database(e.to_string())
        })
    }
}
