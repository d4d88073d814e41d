//! Top-rated fallback ranking
//!
//! Used whenever the content recommender cannot personalize: no snapshot,
//! no bookings, or no booked hotel present in the snapshot.
//!
//! Rating signal priority (first signal carried by any hotel wins):
//! `review_score` → `hotel_rating` → `stars` → `rating`.
//! Without any signal the first `count` hotels in snapshot order are returned.
//!
//! Every returned item has `similarity_score = None` so callers can tell a
//! non-personalized list apart from a personalized score of zero.

use crate::models::{HotelRecommendation, HotelRecord};
use crate::utils::rank_descending_by;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSignal {
    ReviewScore,
    HotelRating,
    Stars,
    Rating,
}

impl RatingSignal {
    pub const PRIORITY: [RatingSignal; 4] = [
        RatingSignal::ReviewScore,
        RatingSignal::HotelRating,
        RatingSignal::Stars,
        RatingSignal::Rating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingSignal::ReviewScore => "review_score",
            RatingSignal::HotelRating => "hotel_rating",
            RatingSignal::Stars => "stars",
            RatingSignal::Rating => "rating",
        }
    }

    pub fn value(&self, hotel: &HotelRecord) -> Option<f64> {
        match self {
            RatingSignal::ReviewScore => hotel.review_score,
            RatingSignal::HotelRating => hotel.hotel_rating,
            RatingSignal::Stars => hotel.stars,
            RatingSignal::Rating => hotel.rating,
        }
    }

    /// Highest-priority signal present on at least one hotel
    pub fn select(hotels: &[HotelRecord]) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|signal| hotels.iter().any(|hotel| signal.value(hotel).is_some()))
    }
}

/// Up to `count` hotels ordered by the best available rating signal.
///
/// Hotels without a value for the selected signal rank after rated ones;
/// ties keep snapshot order. Never fails.
pub fn top_rated_hotels(hotels: &[HotelRecord], count: usize) -> Vec<HotelRecommendation> {
    if count == 0 || hotels.is_empty() {
        return Vec::new();
    }

    let order: Vec<usize> = match RatingSignal::select(hotels) {
        Some(signal) => {
            debug!(signal = signal.as_str(), "Ranking fallback hotels by rating signal");
            rank_descending_by(hotels.len(), |idx| signal.value(&hotels[idx]))
        }
        None => {
            debug!("No rating signal found, using snapshot order");
            (0..hotels.len()).collect()
        }
    };

    order
        .into_iter()
        .take(count)
        .map(|idx| HotelRecommendation::from_record(&hotels[idx], None))
        .collect()
}
