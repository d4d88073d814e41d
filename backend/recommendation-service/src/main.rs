use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotel_recommendation_service::config::Config;
use hotel_recommendation_service::db::{BookingRepo, HotelRepo, UserMappingRepo};
use hotel_recommendation_service::handlers::{self, RecommendationHandlerState};
use hotel_recommendation_service::error::AppError;
use hotel_recommendation_service::metrics;
use hotel_recommendation_service::services::{FactorModel, RecommendationService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        "Starting hotel-recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app_env);

    // Initialize database
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    // The service must not serve factor recommendations without a model
    let factor_model = FactorModel::load(&config.factor_model_path)
        .map_err(AppError::from)
        .with_context(|| format!("Failed to load factor model {}", config.factor_model_path))?;

    let service = Arc::new(
        RecommendationService::new(
            Arc::new(HotelRepo::new(db_pool.clone())),
            Arc::new(BookingRepo::new(db_pool.clone())),
            Arc::new(UserMappingRepo::new(db_pool.clone())),
            Arc::new(factor_model),
        )
        .with_max_count(config.max_recommendation_count),
    );

    if config.rebuild_on_startup {
        let status = service.rebuild().await;
        if !status.is_success() {
            tracing::warn!(
                message = %status.message,
                "Starting without hotel data, content requests will fall back"
            );
        }
    }

    let handler_state = web::Data::new(RecommendationHandlerState {
        service,
        default_content_count: config.default_content_count,
        default_factor_count: config.default_factor_count,
    });

    let cors_origins = config.cors_origins();
    let bind_addr = format!("{}:{}", config.http_host, config.http_port);
    tracing::info!("HTTP server listening on {}", bind_addr);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        let cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(handler_state.clone())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .configure(handlers::configure)
            .wrap_fn(|req, srv| {
                let method = req.method().to_string();
                let path = req
                    .match_pattern()
                    .unwrap_or_else(|| req.path().to_string());
                let start = Instant::now();

                let fut = srv.call(req);
                async move {
                    match fut.await {
                        Ok(res) => {
                            metrics::observe_http_request(
                                &method,
                                &path,
                                res.status().as_u16(),
                                start.elapsed(),
                            );
                            Ok(res)
                        }
                        Err(err) => {
                            metrics::observe_http_request(&method, &path, 500, start.elapsed());
                            Err(err)
                        }
                    }
                }
            })
            .wrap(cors)
            .wrap(TracingLogger::default())
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await
    .context("HTTP server error")
}
