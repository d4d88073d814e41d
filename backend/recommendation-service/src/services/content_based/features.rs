//! Feature Encoder
//!
//! Turns the hotel snapshot into a dense feature matrix, one row per hotel:
//!
//! ```text
//! [ amenity_0 .. amenity_A | stars | price | city_0 .. city_C ]
//! ```
//!
//! - amenities: binary, vocabulary = union of tokens over the whole snapshot
//! - stars, price: raw values, absent values encoded as 0
//! - city: one-hot over the cities present in this snapshot
//!
//! Column positions are only meaningful within one build. They must not be
//! persisted or compared across rebuilds.

use crate::models::HotelRecord;
use ndarray::Array2;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Column layout of one build
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    amenities: Vec<String>,
    cities: Vec<String>,
    amenity_columns: HashMap<String, usize>,
    city_columns: HashMap<String, usize>,
}

impl FeatureLayout {
    /// Derive the layout from every hotel in the snapshot
    pub fn from_hotels(hotels: &[HotelRecord]) -> Self {
        let amenities: Vec<String> = hotels
            .iter()
            .flat_map(|hotel| hotel.amenities.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cities: Vec<String> = hotels
            .iter()
            .filter_map(|hotel| hotel.city.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let amenity_columns = amenities
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        let city_offset = amenities.len() + 2;
        let city_columns = cities
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), city_offset + idx))
            .collect();

        Self {
            amenities,
            cities,
            amenity_columns,
            city_columns,
        }
    }

    pub fn width(&self) -> usize {
        self.amenities.len() + 2 + self.cities.len()
    }

    pub fn amenity_count(&self) -> usize {
        self.amenities.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn amenity_column(&self, amenity: &str) -> Option<usize> {
        self.amenity_columns.get(amenity).copied()
    }

    pub fn city_column(&self, city: &str) -> Option<usize> {
        self.city_columns.get(city).copied()
    }

    pub fn stars_column(&self) -> usize {
        self.amenities.len()
    }

    pub fn price_column(&self) -> usize {
        self.amenities.len() + 1
    }
}

/// Encoded feature matrix together with the layout it was built with
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub layout: FeatureLayout,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }
}

/// Encode every hotel of the snapshot into a fixed-width feature row.
///
/// Missing stars and price are imputed as 0, which biases similarity towards
/// hotels that do carry those values. This is a known limitation.
pub fn encode_features(hotels: &[HotelRecord]) -> FeatureMatrix {
    let layout = FeatureLayout::from_hotels(hotels);
    let mut values = Array2::<f64>::zeros((hotels.len(), layout.width()));

    for (row, hotel) in hotels.iter().enumerate() {
        for amenity in &hotel.amenities {
            if let Some(col) = layout.amenity_column(amenity) {
                values[[row, col]] = 1.0;
            }
        }

        values[[row, layout.stars_column()]] = hotel.stars.unwrap_or(0.0);
        values[[row, layout.price_column()]] = hotel.price.unwrap_or(0.0);

        if let Some(col) = hotel.city.as_deref().and_then(|c| layout.city_column(c)) {
            values[[row, col]] = 1.0;
        }
    }

    debug!(
        hotels = hotels.len(),
        amenities = layout.amenity_count(),
        cities = layout.city_count(),
        width = layout.width(),
        "Encoded hotel feature matrix"
    );

    FeatureMatrix { layout, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: i64, amenities: &[&str], city: Option<&str>) -> HotelRecord {
        HotelRecord {
            hotel_id: id,
            name: format!("Hotel {}", id),
            city: city.map(str::to_string),
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_width_and_columns() {
        let hotels = vec![
            hotel(1, &["Pool", "WiFi"], Some("Rome")),
            hotel(2, &["WiFi", "Gym"], Some("Oslo")),
        ];
        let layout = FeatureLayout::from_hotels(&hotels);

        // 3 amenities + stars + price + 2 cities
        assert_eq!(layout.width(), 7);
        assert_eq!(layout.amenity_count(), 3);
        assert_eq!(layout.city_count(), 2);
        assert_eq!(layout.stars_column(), 3);
        assert_eq!(layout.price_column(), 4);
        assert!(layout.city_column("Rome").unwrap() >= 5);
        assert!(layout.city_column("Paris").is_none());
    }

    #[test]
    fn test_encode_binary_amenities_and_one_hot_city() {
        let hotels = vec![
            hotel(1, &["Pool", "WiFi"], Some("Rome")),
            hotel(2, &["Gym"], None),
        ];
        let matrix = encode_features(&hotels);
        let layout = &matrix.layout;

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.values[[0, layout.amenity_column("Pool").unwrap()]], 1.0);
        assert_eq!(matrix.values[[0, layout.amenity_column("Gym").unwrap()]], 0.0);
        assert_eq!(matrix.values[[1, layout.amenity_column("Gym").unwrap()]], 1.0);
        assert_eq!(matrix.values[[0, layout.city_column("Rome").unwrap()]], 1.0);
        // Hotel without a city has no city bit set
        assert_eq!(matrix.values[[1, layout.city_column("Rome").unwrap()]], 0.0);
    }

    #[test]
    fn test_missing_stars_and_price_imputed_as_zero() {
        let mut priced = hotel(1, &[], None);
        priced.stars = Some(4.0);
        priced.price = Some(180.0);
        let bare = hotel(2, &[], None);

        let matrix = encode_features(&[priced, bare]);
        let layout = &matrix.layout;

        assert_eq!(matrix.values[[0, layout.stars_column()]], 4.0);
        assert_eq!(matrix.values[[0, layout.price_column()]], 180.0);
        assert_eq!(matrix.values[[1, layout.stars_column()]], 0.0);
        assert_eq!(matrix.values[[1, layout.price_column()]], 0.0);
    }

    #[test]
    fn test_encode_empty_snapshot() {
        let matrix = encode_features(&[]);
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.width(), 2);
    }
}
