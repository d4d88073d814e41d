/// Operational endpoints: snapshot refresh, health, model info
use actix_web::{get, post, web, HttpResponse};
use tracing::info;

use super::RecommendationHandlerState;
use crate::error::Result;

async fn refresh(state: &RecommendationHandlerState) -> HttpResponse {
    info!("Hotel data refresh requested");
    // Failures are reported in the body, the request itself succeeded
    HttpResponse::Ok().json(state.service.rebuild().await)
}

/// GET /refresh-data
#[get("/refresh-data")]
pub async fn refresh_data_get(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    refresh(&state).await
}

/// POST /refresh-data
#[post("/refresh-data")]
pub async fn refresh_data_post(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    refresh(&state).await
}

/// GET /health
#[get("/health")]
pub async fn health(state: web::Data<RecommendationHandlerState>) -> HttpResponse {
    HttpResponse::Ok().json(state.service.health().await)
}

/// GET /model-info
#[get("/model-info")]
pub async fn model_info(state: web::Data<RecommendationHandlerState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.service.model_info().await))
}
