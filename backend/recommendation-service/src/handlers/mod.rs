pub mod admin;
pub mod recommendation;

use actix_web::web;

pub use admin::{health, model_info, refresh_data_get, refresh_data_post};
pub use recommendation::{
    recommend_by_uuid, recommend_content, recommend_factor, ContentQuery, FactorQuery,
    RecommendationHandlerState,
};

/// Register every endpoint except `/metrics`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recommend_content)
        .service(recommend_factor)
        .service(recommend_by_uuid)
        .service(refresh_data_get)
        .service(refresh_data_post)
        .service(health)
        .service(model_info);
}
