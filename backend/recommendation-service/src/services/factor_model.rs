// ============================================
// Factor Model Recommender
// ============================================
//
// Pre-trained matrix factorization, loaded once at startup:
//
//   score(user) = user_factors[user] · hotel_factors      (1 × k) · (k × hotels)
//
// Artifact (JSON `.json` or bincode `.bin`):
//   { user_features: [[f32]], hotel_features: [[f32]], user_ids: [str], hotel_ids: [i64] }

use crate::error::{AppError, Result};
use crate::models::FactorModelInfo;
use crate::utils::rank_descending_by;
use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum FactorModelError {
    #[error("failed to read factor model {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode factor model: {0}")]
    Decode(String),

    #[error("unsupported factor model format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid factor model shape: {0}")]
    Shape(String),
}

impl From<FactorModelError> for AppError {
    fn from(err: FactorModelError) -> Self {
        AppError::ModelLoad(err.to_string())
    }
}

/// On-disk layout of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorModelArtifact {
    pub user_features: Vec<Vec<f32>>,
    pub hotel_features: Vec<Vec<f32>>,
    pub user_ids: Vec<String>,
    pub hotel_ids: Vec<i64>,
}

impl FactorModelArtifact {
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, FactorModelError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FactorModelError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_slice(&bytes)
                .map_err(|e| FactorModelError::Decode(e.to_string())),
            Some("bin") => {
                bincode::deserialize(&bytes).map_err(|e| FactorModelError::Decode(e.to_string()))
            }
            other => Err(FactorModelError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Immutable factor model shared by every request
#[derive(Debug)]
pub struct FactorModel {
    /// users × k
    user_factors: Array2<f32>,
    /// k × hotels
    hotel_factors: Array2<f32>,
    user_index: HashMap<String, usize>,
    hotel_ids: Vec<i64>,
    loaded_at: DateTime<Utc>,
}

impl FactorModel {
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, FactorModelError> {
        let path = path.as_ref();
        let model = Self::from_artifact(FactorModelArtifact::from_file(path)?)?;

        info!(
            path = %path.display(),
            users = model.user_count(),
            hotels = model.hotel_count(),
            factors = model.factor_count(),
            "Factor model loaded"
        );

        Ok(model)
    }

    /// Validate an artifact and bring the hotel factors into k × hotels layout
    pub fn from_artifact(
        artifact: FactorModelArtifact,
    ) -> std::result::Result<Self, FactorModelError> {
        let FactorModelArtifact {
            user_features,
            hotel_features,
            user_ids,
            hotel_ids,
        } = artifact;

        if user_ids.is_empty() || hotel_ids.is_empty() {
            return Err(FactorModelError::Shape(
                "model must contain at least one user and one hotel".to_string(),
            ));
        }

        if user_features.len() != user_ids.len() {
            return Err(FactorModelError::Shape(format!(
                "{} user factor rows for {} user ids",
                user_features.len(),
                user_ids.len()
            )));
        }

        let user_factors = to_matrix(user_features, "user_features")?;
        let factors = user_factors.ncols();
        if factors == 0 {
            return Err(FactorModelError::Shape("zero latent factors".to_string()));
        }

        let stored = to_matrix(hotel_features, "hotel_features")?;
        let hotel_factors = match stored.dim() {
            (k, n) if k == factors && n == hotel_ids.len() => stored,
            (n, k) if n == hotel_ids.len() && k == factors => stored.reversed_axes(),
            (rows, cols) => {
                return Err(FactorModelError::Shape(format!(
                    "hotel_features is {}x{}, expected {}x{}",
                    rows,
                    cols,
                    factors,
                    hotel_ids.len()
                )))
            }
        };

        let mut user_index = HashMap::with_capacity(user_ids.len());
        for (idx, user_id) in user_ids.into_iter().enumerate() {
            if user_index.contains_key(&user_id) {
                warn!(user_id = %user_id, "Duplicate user id in factor model, keeping first");
                continue;
            }
            user_index.insert(user_id, idx);
        }

        Ok(Self {
            user_factors,
            hotel_factors,
            user_index,
            hotel_ids,
            loaded_at: Utc::now(),
        })
    }

    /// Top `top_n` hotel ids for a user known to the model.
    ///
    /// Ties keep hotel index order. Unknown users are `NotFound`: the id was
    /// never part of training, there is no fallback on this path.
    pub fn recommend(&self, user_id: &str, top_n: usize) -> Result<Vec<i64>> {
        let row = match self.user_index.get(user_id) {
            Some(&row) => row,
            None => {
                debug!(user_id = %user_id, "User not found in factor model");
                return Err(AppError::NotFound("User not found in model".to_string()));
            }
        };

        let scores = self.user_factors.row(row).dot(&self.hotel_factors);

        Ok(rank_descending_by(scores.len(), |idx| {
            let score = f64::from(scores[idx]);
            score.is_finite().then_some(score)
        })
        .into_iter()
        .take(top_n)
        .map(|idx| self.hotel_ids[idx])
        .collect())
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.user_index.contains_key(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.user_factors.nrows()
    }

    pub fn hotel_count(&self) -> usize {
        self.hotel_ids.len()
    }

    pub fn factor_count(&self) -> usize {
        self.user_factors.ncols()
    }

    pub fn info(&self) -> FactorModelInfo {
        FactorModelInfo {
            user_count: self.user_count(),
            hotel_count: self.hotel_count(),
            factor_count: self.factor_count(),
            loaded_at: self.loaded_at,
        }
    }
}

fn to_matrix(
    rows: Vec<Vec<f32>>,
    field: &str,
) -> std::result::Result<Array2<f32>, FactorModelError> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);

    if let Some(bad) = rows.iter().position(|row| row.len() != width) {
        return Err(FactorModelError::Shape(format!(
            "{} row {} has {} values, expected {}",
            field,
            bad,
            rows[bad].len(),
            width
        )));
    }

    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| FactorModelError::Shape(format!("{}: {}", field, e)))
}
