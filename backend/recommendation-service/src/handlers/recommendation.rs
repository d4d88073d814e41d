/// Recommendation API Handlers
///
/// HTTP endpoints for content-based and factor model recommendations
use actix_web::{get, web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::services::RecommendationService;

/// Handler state shared by all endpoints
pub struct RecommendationHandlerState {
    pub service: Arc<RecommendationService>,
    pub default_content_count: usize,
    pub default_factor_count: usize,
}

/// Query parameters for GET /recommend
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub user_id: String,

    /// Number of hotels to return (default from config, clamped to max)
    pub num_recommendations: Option<usize>,
}

/// Query parameters for the factor model endpoints
#[derive(Debug, Deserialize)]
pub struct FactorQuery {
    pub top_n: Option<usize>,
}

/// GET /recommend?user_id=..&num_recommendations=6
/// Content-based recommendations; falls back to top-rated hotels
#[get("/recommend")]
pub async fn recommend_content(
    query: web::Query<ContentQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let count = query
        .num_recommendations
        .unwrap_or(state.default_content_count);

    debug!(user_id = %query.user_id, count, "Content recommendation request");

    let hotels = state.service.recommend_content(&query.user_id, count).await;
    Ok(HttpResponse::Ok().json(hotels))
}

/// GET /recommend/{user_id}?top_n=5
/// Factor model recommendations for a model user id; 404 when unknown
#[get("/recommend/{user_id}")]
pub async fn recommend_factor(
    path: web::Path<String>,
    query: web::Query<FactorQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let top_n = query.top_n.unwrap_or(state.default_factor_count);

    let response = state.service.recommend_factor(&user_id, top_n)?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /recommend_by_uuid/{uuid}?top_n=5
/// Factor model recommendations for an auth user; 404 when not mapped
#[get("/recommend_by_uuid/{uuid}")]
pub async fn recommend_by_uuid(
    path: web::Path<String>,
    query: web::Query<FactorQuery>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let uuid = path.into_inner();
    let top_n = query.top_n.unwrap_or(state.default_factor_count);

    let response = state
        .service
        .recommend_factor_by_identity(&uuid, top_n)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
