// ============================================
// Content-Based Hotel Recommendation
// ============================================
//
// Data Flow:
//   Hotel catalog → Feature Encoder → Similarity Engine → HotelSnapshot
//   Bookings(user) → booked rows → mean similarity → ranked, booked hotels removed
//                                        ↓
//                        Fallback Ranker (no snapshot / bookings / matches)

pub mod features;
pub mod similarity;
pub mod snapshot;

pub use features::{encode_features, FeatureLayout, FeatureMatrix};
pub use similarity::{cosine_similarity, similarity_matrix};
pub use snapshot::{HotelSnapshot, SnapshotStore};

use crate::db::BookingStore;
use crate::metrics;
use crate::models::HotelRecommendation;
use crate::services::fallback_ranking::top_rated_hotels;
use crate::utils::rank_descending;
use ndarray::Axis;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a request could not be personalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    SnapshotUnavailable,
    SnapshotInconsistent,
    BookingLookupFailed,
    NoBookings,
    NoMatchingHotels,
}

impl DegradeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradeReason::SnapshotUnavailable => "snapshot_unavailable",
            DegradeReason::SnapshotInconsistent => "snapshot_inconsistent",
            DegradeReason::BookingLookupFailed => "booking_lookup_failed",
            DegradeReason::NoBookings => "no_bookings",
            DegradeReason::NoMatchingHotels => "no_matching_hotels",
        }
    }
}

/// Outcome of the personalization attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Personalization {
    Ranked(Vec<HotelRecommendation>),
    Degraded(DegradeReason),
}

/// Rank the snapshot against a user's booked hotels.
///
/// Score of a hotel = mean of its similarity to every booked row. Hotels are
/// ordered by descending score with ties kept in snapshot order, booked rows
/// are removed, and the first `count` remain.
pub fn rank_by_bookings(
    snapshot: &HotelSnapshot,
    booked_hotel_ids: &HashSet<i64>,
    count: usize,
) -> Personalization {
    if booked_hotel_ids.is_empty() {
        return Personalization::Degraded(DegradeReason::NoBookings);
    }

    if !snapshot.is_consistent() {
        return Personalization::Degraded(DegradeReason::SnapshotInconsistent);
    }

    let booked_rows = snapshot.rows_for(booked_hotel_ids);
    if booked_rows.is_empty() {
        return Personalization::Degraded(DegradeReason::NoMatchingHotels);
    }

    let scores = match snapshot
        .similarity()
        .select(Axis(0), &booked_rows)
        .mean_axis(Axis(0))
    {
        Some(scores) => scores.to_vec(),
        None => return Personalization::Degraded(DegradeReason::NoMatchingHotels),
    };

    let excluded: HashSet<usize> = booked_rows.into_iter().collect();
    let hotels = snapshot.hotels();

    let ranked = rank_descending(&scores)
        .into_iter()
        .filter(|idx| !excluded.contains(idx))
        .take(count)
        .map(|idx| HotelRecommendation::from_record(&hotels[idx], Some(scores[idx])))
        .collect();

    Personalization::Ranked(ranked)
}

/// Booking-aware content recommender.
///
/// Always answers with at most `count` hotels; personalization failures
/// degrade to the top-rated fallback over the same snapshot.
pub struct ContentRecommender {
    snapshots: Arc<SnapshotStore>,
    bookings: Arc<dyn BookingStore>,
}

impl ContentRecommender {
    pub fn new(snapshots: Arc<SnapshotStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self {
            snapshots,
            bookings,
        }
    }

    pub async fn recommend(&self, user_id: &str, count: usize) -> Vec<HotelRecommendation> {
        // One snapshot for the whole request, even if a rebuild lands meanwhile
        let snapshot = self.snapshots.current().await;

        match self.personalize(snapshot.as_deref(), user_id, count).await {
            Personalization::Ranked(hotels) => {
                metrics::record_content_recommendation("personalized");
                debug!(
                    user_id = %user_id,
                    returned = hotels.len(),
                    "Returning personalized recommendations"
                );
                hotels
            }
            Personalization::Degraded(reason) => {
                metrics::record_content_recommendation("fallback");
                metrics::record_content_fallback(reason.as_str());
                info!(
                    user_id = %user_id,
                    reason = reason.as_str(),
                    "Returning top rated hotels"
                );
                let hotels = snapshot.as_deref().map(|s| s.hotels()).unwrap_or_default();
                top_rated_hotels(hotels, count)
            }
        }
    }

    async fn personalize(
        &self,
        snapshot: Option<&HotelSnapshot>,
        user_id: &str,
        count: usize,
    ) -> Personalization {
        let snapshot = match snapshot {
            Some(snapshot) => snapshot,
            None => return Personalization::Degraded(DegradeReason::SnapshotUnavailable),
        };

        let booked = match self.bookings.bookings_for_user(user_id).await {
            Ok(ids) => ids.into_iter().collect::<HashSet<i64>>(),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to get user bookings");
                return Personalization::Degraded(DegradeReason::BookingLookupFailed);
            }
        };

        debug!(user_id = %user_id, booked = booked.len(), "Resolved user bookings");

        rank_by_bookings(snapshot, &booked, count)
    }
}
