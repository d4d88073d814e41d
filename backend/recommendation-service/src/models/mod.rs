use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod hotel;

pub use hotel::{parse_amenities, AmenityParseError, HotelRecord, RecordError};

/// Hotel summary returned by the content recommender.
///
/// `similarity_score` is `None` when the list was produced by the fallback
/// ranker, which is distinct from a personalized score of `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecommendation {
    pub hotel_id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub price: f64,
    pub stars: Option<f64>,
    pub image_url: String,
    pub amenities: Vec<String>,
    pub similarity_score: Option<f64>,
}

impl HotelRecommendation {
    pub fn from_record(record: &HotelRecord, similarity_score: Option<f64>) -> Self {
        Self {
            hotel_id: record.hotel_id,
            name: record.name.clone(),
            city: record.city.clone().unwrap_or_default(),
            country: record.country.clone().unwrap_or_default(),
            price: record.price.unwrap_or(0.0),
            stars: record.stars,
            image_url: record.image_url.clone().unwrap_or_default(),
            amenities: record.amenities.clone(),
            similarity_score,
        }
    }
}

/// Factor model ranking result (no scores by contract)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRecommendationResponse {
    pub user_id: String,
    pub recommended_hotel_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildOutcome {
    Success,
    Error,
}

/// Result of an explicit snapshot rebuild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuildStatus {
    pub status: RebuildOutcome,
    pub message: String,
}

impl RebuildStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: RebuildOutcome::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RebuildOutcome::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RebuildOutcome::Success
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub data_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub hotel_count: usize,
    pub feature_width: usize,
    pub amenity_count: usize,
    pub city_count: usize,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorModelInfo {
    pub user_count: usize,
    pub hotel_count: usize,
    pub factor_count: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub factor_model: FactorModelInfo,
    pub snapshot: Option<SnapshotInfo>,
}
