use super::features::{encode_features, FeatureMatrix};
use super::similarity::similarity_matrix;
use crate::models::{HotelRecord, SnapshotInfo};
use chrono::{DateTime, Utc};
use ndarray::Array2;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Immutable result of one catalog build.
///
/// Hotels, feature matrix and similarity matrix are always built and
/// replaced together, so row `i` means the same hotel in all three.
#[derive(Debug)]
pub struct HotelSnapshot {
    hotels: Vec<HotelRecord>,
    features: FeatureMatrix,
    similarity: Array2<f64>,
    built_at: DateTime<Utc>,
}

impl HotelSnapshot {
    /// Encode features and compute pairwise similarity for a catalog read
    pub fn build(hotels: Vec<HotelRecord>) -> Self {
        let features = encode_features(&hotels);
        let similarity = similarity_matrix(&features.values);

        info!(
            hotels = hotels.len(),
            feature_width = features.width(),
            "Hotel snapshot built"
        );

        Self {
            hotels,
            features,
            similarity,
            built_at: Utc::now(),
        }
    }

    pub fn hotels(&self) -> &[HotelRecord] {
        &self.hotels
    }

    pub fn similarity(&self) -> &Array2<f64> {
        &self.similarity
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    /// Row indices of every hotel whose identifier is in `hotel_ids`,
    /// in snapshot order. Unknown identifiers are ignored.
    pub fn rows_for(&self, hotel_ids: &HashSet<i64>) -> Vec<usize> {
        self.hotels
            .iter()
            .enumerate()
            .filter(|(_, hotel)| hotel_ids.contains(&hotel.hotel_id))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Row count of hotels, features and similarity agree
    pub fn is_consistent(&self) -> bool {
        let n = self.hotels.len();
        self.features.rows() == n && self.similarity.dim() == (n, n)
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            hotel_count: self.hotels.len(),
            feature_width: self.features.width(),
            amenity_count: self.features.layout.amenity_count(),
            city_count: self.features.layout.city_count(),
            built_at: self.built_at,
        }
    }
}

/// Holder of the currently served snapshot.
///
/// Readers clone the `Arc` and keep using that snapshot for the rest of the
/// request; a rebuild swaps in a new `Arc` without touching the old one.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<HotelSnapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: HotelSnapshot) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    pub async fn current(&self) -> Option<Arc<HotelSnapshot>> {
        self.current.read().await.clone()
    }

    /// Install a new snapshot, returning the one it replaced
    pub async fn replace(&self, snapshot: HotelSnapshot) -> Option<Arc<HotelSnapshot>> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().await;
        guard.replace(next)
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: i64, amenities: &[&str]) -> HotelRecord {
        HotelRecord {
            hotel_id: id,
            name: format!("Hotel {}", id),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let snapshot = HotelSnapshot::build(vec![hotel(1, &["A"]), hotel(2, &["B"])]);
        assert!(snapshot.is_consistent());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.similarity().dim(), (2, 2));
    }

    #[test]
    fn test_rows_for_ignores_unknown_ids() {
        let snapshot = HotelSnapshot::build(vec![hotel(10, &["A"]), hotel(20, &["B"])]);
        let ids: HashSet<i64> = [20, 99].into_iter().collect();
        assert_eq!(snapshot.rows_for(&ids), vec![1]);
    }

    #[tokio::test]
    async fn test_store_swap_keeps_old_snapshot_alive_for_readers() {
        let store = SnapshotStore::with_snapshot(HotelSnapshot::build(vec![hotel(1, &["A"])]));

        let in_flight = store.current().await.unwrap();
        let previous = store
            .replace(HotelSnapshot::build(vec![hotel(1, &["A"]), hotel(2, &["B"])]))
            .await;

        assert_eq!(in_flight.len(), 1);
        assert_eq!(previous.unwrap().len(), 1);
        assert_eq!(store.current().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = SnapshotStore::new();
        assert!(!store.is_loaded().await);
        assert!(store.current().await.is_none());
    }
}
