/// Hotel catalog repository
///
/// Rows are read as JSON objects so optional and differently named columns
/// (`hotelid` / `hotel_id`, `hotel_name` / `name`, rating signals) can be
/// resolved field by field in [`HotelRecord::from_json`].
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, warn};

use super::HotelSource;
use crate::error::{AppError, Result};
use crate::models::HotelRecord;

pub struct HotelRepo {
    pool: PgPool,
}

impl HotelRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelSource for HotelRepo {
    async fn fetch_all_hotels(&self) -> Result<Vec<HotelRecord>> {
        let rows = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT to_jsonb(h) AS record
            FROM hotels h
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch hotels: {}", e);
            AppError::Database(e.to_string())
        })?;

        Ok(records_from_rows(&rows))
    }
}

/// Extract hotel records, skipping rows without a usable identifier.
/// The result is ordered by hotel id.
pub fn records_from_rows(rows: &[Value]) -> Vec<HotelRecord> {
    let mut hotels: Vec<HotelRecord> = rows
        .iter()
        .filter_map(|row| match HotelRecord::from_json(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Skipping hotel row");
                None
            }
        })
        .collect();

    hotels.sort_by_key(|hotel| hotel.hotel_id);
    hotels
}
