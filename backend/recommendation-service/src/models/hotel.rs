//! Hotel record extraction
//!
//! Hotel rows are read as loosely-typed JSON objects. Every field has an
//! explicit absence policy:
//!
//! | field        | source keys (first match wins) | absent            |
//! |--------------|--------------------------------|-------------------|
//! | hotel_id     | `hotelid`, `hotel_id`          | record rejected   |
//! | name         | `hotel_name`, `name`           | "Unknown Hotel"   |
//! | city/country | `city` / `country`             | `None`            |
//! | price        | `price`                        | `None` (encoded 0)|
//! | stars        | `stars`                        | `None` (encoded 0)|
//! | image_url    | `image_url`                    | `None`            |
//! | amenities    | `amenities`                    | empty set         |
//! | ratings      | `review_score`, `hotel_rating`, `rating` | `None`  |

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

const ID_KEYS: &[&str] = &["hotelid", "hotel_id"];
const NAME_KEYS: &[&str] = &["hotel_name", "name"];
const UNKNOWN_HOTEL_NAME: &str = "Unknown Hotel";

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no usable hotel identifier")]
    MissingIdentifier,
}

#[derive(Debug, Error, PartialEq)]
#[error("malformed amenity list: {0}")]
pub struct AmenityParseError(pub String);

/// One hotel from the catalog snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotelRecord {
    pub hotel_id: i64,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price: Option<f64>,
    pub stars: Option<f64>,
    pub image_url: Option<String>,
    pub amenities: Vec<String>,
    pub review_score: Option<f64>,
    pub hotel_rating: Option<f64>,
    pub rating: Option<f64>,
}

impl HotelRecord {
    /// Extract a record from a JSON row.
    ///
    /// A malformed amenity value never rejects the record: it is logged and
    /// the record continues with an empty amenity set.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject)?;

        let hotel_id = ID_KEYS
            .iter()
            .find_map(|key| integer_field(obj, key))
            .ok_or(RecordError::MissingIdentifier)?;

        let name = NAME_KEYS
            .iter()
            .find_map(|key| string_field(obj, key))
            .unwrap_or_else(|| UNKNOWN_HOTEL_NAME.to_string());

        let amenities = match obj.get("amenities") {
            Some(raw) => parse_amenities(raw).unwrap_or_else(|e| {
                warn!(hotel_id = hotel_id, error = %e, "Failed to parse amenities");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self {
            hotel_id,
            name,
            city: string_field(obj, "city"),
            country: string_field(obj, "country"),
            price: number_field(obj, "price"),
            stars: number_field(obj, "stars"),
            image_url: string_field(obj, "image_url"),
            amenities,
            review_score: number_field(obj, "review_score"),
            hotel_rating: number_field(obj, "hotel_rating"),
            rating: number_field(obj, "rating"),
        })
    }
}

/// Parse an amenity value in any of the accepted shapes:
/// - a JSON array of tokens
/// - a string holding a list literal, e.g. `"['WiFi', 'Pool']"`
/// - a plain comma separated string, e.g. `"WiFi, Pool"`
///
/// `null` and other JSON types yield an empty set.
pub fn parse_amenities(raw: &Value) -> Result<Vec<String>, AmenityParseError> {
    match raw {
        Value::Array(items) => Ok(tokens_from_array(items)),
        Value::String(text) => parse_amenity_string(text),
        _ => Ok(Vec::new()),
    }
}

fn parse_amenity_string(text: &str) -> Result<Vec<String>, AmenityParseError> {
    let trimmed = text.trim();

    if trimmed.starts_with('[') {
        // Valid JSON first, then list literals written with single quotes
        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(parsed) => parsed,
            Err(_) => serde_json::from_str(&trimmed.replace('\'', "\""))
                .map_err(|e| AmenityParseError(format!("{}: {}", text, e)))?,
        };

        return match parsed {
            Value::Array(items) => Ok(tokens_from_array(&items)),
            _ => Err(AmenityParseError(text.to_string())),
        };
    }

    Ok(trimmed
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

fn tokens_from_array(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|token| !token.trim().is_empty())
        .collect()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    value.is_finite().then_some(value)
}

fn integer_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
