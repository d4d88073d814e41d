#![allow(dead_code)]

use async_trait::async_trait;
use hotel_recommendation_service::db::{BookingStore, HotelSource, IdentityStore};
use hotel_recommendation_service::error::{AppError, Result};
use hotel_recommendation_service::models::HotelRecord;
use hotel_recommendation_service::services::{FactorModel, FactorModelArtifact};
use hotel_recommendation_service::RecommendationService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const MAPPED_UUID: &str = "6f1c2a8e-3b4d-4e5f-8a9b-0c1d2e3f4a5b";
pub const UNMAPPED_UUID: &str = "0a0b0c0d-1111-2222-3333-444455556666";

/// Catalog whose contents can be replaced between rebuilds
#[derive(Default)]
pub struct InMemoryHotels {
    hotels: Mutex<Option<Vec<HotelRecord>>>,
}

impl InMemoryHotels {
    pub fn new(hotels: Vec<HotelRecord>) -> Self {
        Self {
            hotels: Mutex::new(Some(hotels)),
        }
    }

    pub fn set(&self, hotels: Vec<HotelRecord>) {
        *self.hotels.lock().unwrap() = Some(hotels);
    }

    /// Make the next reads fail like an unreachable database
    pub fn fail(&self) {
        *self.hotels.lock().unwrap() = None;
    }
}

#[async_trait]
impl HotelSource for InMemoryHotels {
    async fn fetch_all_hotels(&self) -> Result<Vec<HotelRecord>> {
        self.hotels
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Database("catalog unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryBookings {
    by_user: HashMap<String, Vec<i64>>,
    failing: bool,
}

impl InMemoryBookings {
    pub fn with(mut self, user_id: &str, hotel_ids: &[i64]) -> Self {
        self.by_user.insert(user_id.to_string(), hotel_ids.to_vec());
        self
    }

    pub fn failing() -> Self {
        Self {
            by_user: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryBookings {
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<i64>> {
        if self.failing {
            return Err(AppError::Database("bookings unavailable".to_string()));
        }
        Ok(self.by_user.get(user_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct InMemoryIdentities {
    mappings: HashMap<Uuid, String>,
}

impl InMemoryIdentities {
    pub fn with(mut self, uuid: &str, model_user_id: &str) -> Self {
        let uuid = Uuid::parse_str(uuid).expect("valid test uuid");
        self.mappings.insert(uuid, model_user_id.to_string());
        self
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentities {
    async fn lookup(&self, uuid: Uuid) -> Result<Option<String>> {
        Ok(self.mappings.get(&uuid).cloned())
    }
}

pub fn hotel(id: i64, amenities: &[&str]) -> HotelRecord {
    HotelRecord {
        hotel_id: id,
        name: format!("Hotel {}", id),
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        ..Default::default()
    }
}

pub fn rated_hotel(id: i64, amenities: &[&str], review_score: f64) -> HotelRecord {
    HotelRecord {
        review_score: Some(review_score),
        ..hotel(id, amenities)
    }
}

/// 2 users, 3 hotels; user_0 scores [1, 0, 1], user_1 scores [0, 1, 1]
pub fn factor_model() -> FactorModel {
    FactorModel::from_artifact(FactorModelArtifact {
        user_features: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        hotel_features: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
        user_ids: vec!["user_0".to_string(), "user_1".to_string()],
        hotel_ids: vec![101, 102, 103],
    })
    .expect("valid test factor model")
}

pub fn service(
    hotels: Arc<InMemoryHotels>,
    bookings: InMemoryBookings,
    identities: InMemoryIdentities,
) -> RecommendationService {
    RecommendationService::new(
        hotels,
        Arc::new(bookings),
        Arc::new(identities),
        Arc::new(factor_model()),
    )
}
