// ============================================
// Hotel Recommendation Service - Module Root
// ============================================
//
// Two independent recommenders behind one facade:
// 1. Content-based: booked hotels → amenity/stars/price/city similarity
//    (fails open to top-rated hotels)
// 2. Factor model: pre-trained user × hotel factors (unknown users are 404)
//
// Architecture:
//   HTTP → RecommendationService → ContentRecommender → SnapshotStore (swapped on rebuild)
//                                → FactorModel (immutable, loaded at startup)
//                                → IdentityResolver → FactorModel

pub mod content_based;
pub mod factor_model;
pub mod fallback_ranking;
pub mod identity;

pub use content_based::{
    rank_by_bookings, ContentRecommender, DegradeReason, HotelSnapshot, Personalization,
    SnapshotStore,
};
pub use factor_model::{FactorModel, FactorModelArtifact, FactorModelError};
pub use fallback_ranking::{top_rated_hotels, RatingSignal};
pub use identity::{plan_new_mappings, IdentityResolver};

use crate::db::{BookingStore, HotelSource, IdentityStore};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{
    FactorRecommendationResponse, HealthStatus, HotelRecommendation, ModelInfo, RebuildStatus,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 100;

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error("failed to read hotel catalog: {0}")]
    Source(#[from] AppError),

    #[error("hotel catalog is empty")]
    EmptyCatalog,

    #[error("snapshot build failed: {0}")]
    Build(String),
}

/// Facade over both recommenders, the snapshot lifecycle and the identity
/// lookup. Shared across HTTP workers behind an `Arc`.
pub struct RecommendationService {
    content: ContentRecommender,
    snapshots: Arc<SnapshotStore>,
    hotels: Arc<dyn HotelSource>,
    factor_model: Arc<FactorModel>,
    identity: IdentityResolver,
    rebuild_lock: Mutex<()>,
    max_count: usize,
}

impl RecommendationService {
    pub fn new(
        hotels: Arc<dyn HotelSource>,
        bookings: Arc<dyn BookingStore>,
        identities: Arc<dyn IdentityStore>,
        factor_model: Arc<FactorModel>,
    ) -> Self {
        let snapshots = Arc::new(SnapshotStore::new());

        Self {
            content: ContentRecommender::new(snapshots.clone(), bookings),
            snapshots,
            hotels,
            factor_model,
            identity: IdentityResolver::new(identities),
            rebuild_lock: Mutex::new(()),
            max_count: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    /// Upper bound applied to every requested count
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count;
        self
    }

    /// Content-based recommendations. Never fails; see [`ContentRecommender`].
    pub async fn recommend_content(&self, user_id: &str, count: usize) -> Vec<HotelRecommendation> {
        let count = count.min(self.max_count);
        if count == 0 {
            return Vec::new();
        }

        self.content.recommend(user_id, count).await
    }

    pub fn recommend_factor(
        &self,
        user_id: &str,
        count: usize,
    ) -> Result<FactorRecommendationResponse> {
        let count = count.min(self.max_count);

        match self.factor_model.recommend(user_id, count) {
            Ok(hotel_ids) => {
                metrics::record_factor_recommendation("ok");
                Ok(FactorRecommendationResponse {
                    user_id: user_id.to_string(),
                    recommended_hotel_ids: hotel_ids,
                })
            }
            Err(e) => {
                if matches!(e, AppError::NotFound(_)) {
                    metrics::record_factor_recommendation("user_not_found");
                }
                Err(e)
            }
        }
    }

    /// Resolve an auth UUID to its model user, then rank with the factor model
    pub async fn recommend_factor_by_identity(
        &self,
        uuid: &str,
        count: usize,
    ) -> Result<FactorRecommendationResponse> {
        let model_user_id = match self.identity.resolve(uuid).await {
            Ok(id) => id,
            Err(e) => {
                if matches!(e, AppError::NotFound(_)) {
                    metrics::record_factor_recommendation("mapping_not_found");
                }
                return Err(e);
            }
        };

        self.recommend_factor(&model_user_id, count)
    }

    /// Re-read the catalog and atomically swap in a new snapshot.
    ///
    /// Rebuilds are serialized. On any failure the served snapshot is left
    /// untouched and the error is reported in the returned status.
    pub async fn rebuild(&self) -> RebuildStatus {
        let _guard = self.rebuild_lock.lock().await;
        let started = Instant::now();

        match self.build_snapshot().await {
            Ok(snapshot) => {
                let hotels = snapshot.len();
                self.snapshots.replace(snapshot).await;

                metrics::record_snapshot_rebuild("success", started.elapsed());
                metrics::set_snapshot_hotels(hotels);
                info!(
                    hotels,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Hotel snapshot rebuilt"
                );

                RebuildStatus::success("Data refreshed successfully")
            }
            Err(e) => {
                metrics::record_snapshot_rebuild("error", started.elapsed());
                error!(error = %e, "Hotel snapshot rebuild failed, keeping previous snapshot");

                RebuildStatus::error(format!("Failed to refresh data: {}", e))
            }
        }
    }

    async fn build_snapshot(&self) -> std::result::Result<HotelSnapshot, RebuildError> {
        let hotels = self.hotels.fetch_all_hotels().await?;
        if hotels.is_empty() {
            return Err(RebuildError::EmptyCatalog);
        }

        // O(n²) similarity, keep it off the async workers
        tokio::task::spawn_blocking(move || HotelSnapshot::build(hotels))
            .await
            .map_err(|e| RebuildError::Build(e.to_string()))
    }

    pub async fn health(&self) -> HealthStatus {
        let data_loaded = self.snapshots.is_loaded().await;

        HealthStatus {
            status: "ok".to_string(),
            message: if data_loaded {
                "Hotel recommendation service is running".to_string()
            } else {
                "Hotel recommendation service is running without hotel data".to_string()
            },
            data_loaded,
        }
    }

    pub async fn model_info(&self) -> ModelInfo {
        ModelInfo {
            factor_model: self.factor_model.info(),
            snapshot: self.snapshots.current().await.map(|s| s.info()),
        }
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}
