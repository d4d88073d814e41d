//! Recommendation service metrics
//!
//! Registered lazily in the default Prometheus registry and exposed at
//! `GET /metrics`.

use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, register_int_gauge,
    Encoder, Histogram, HistogramVec, IntCounterVec, IntGauge, TextEncoder,
};
use std::time::Duration;

static CONTENT_RECOMMENDATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "content_recommendations_total",
        "Content recommendation responses by path (personalized/fallback)",
        &["path"]
    )
    .expect("Failed to register content recommendations metric")
});

static CONTENT_FALLBACK_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "content_fallback_total",
        "Content requests served by the top-rated fallback, by reason",
        &["reason"]
    )
    .expect("Failed to register content fallback metric")
});

static FACTOR_RECOMMENDATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "factor_recommendations_total",
        "Factor model recommendation requests by outcome",
        &["outcome"]
    )
    .expect("Failed to register factor recommendations metric")
});

static SNAPSHOT_REBUILDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "snapshot_rebuilds_total",
        "Hotel snapshot rebuilds (success/error)",
        &["status"]
    )
    .expect("Failed to register snapshot rebuilds metric")
});

static SNAPSHOT_REBUILD_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "snapshot_rebuild_duration_seconds",
        "Duration of hotel snapshot rebuilds",
        vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to register snapshot rebuild duration metric")
});

static SNAPSHOT_HOTELS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "snapshot_hotels",
        "Number of hotels in the currently served snapshot"
    )
    .expect("Failed to register snapshot hotels metric")
});

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests handled by hotel-recommendation-service",
        &["method", "path", "status"]
    )
    .expect("Failed to register http requests metric")
});

static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency for hotel-recommendation-service",
        &["method", "path", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("Failed to register http request duration metric")
});

pub fn record_content_recommendation(path: &str) {
    CONTENT_RECOMMENDATIONS_TOTAL.with_label_values(&[path]).inc();
}

pub fn record_content_fallback(reason: &str) {
    CONTENT_FALLBACK_TOTAL.with_label_values(&[reason]).inc();
}

/// ok / user_not_found / mapping_not_found
pub fn record_factor_recommendation(outcome: &str) {
    FACTOR_RECOMMENDATIONS_TOTAL
        .with_label_values(&[outcome])
        .inc();
}

pub fn record_snapshot_rebuild(status: &str, duration: Duration) {
    SNAPSHOT_REBUILDS_TOTAL.with_label_values(&[status]).inc();
    SNAPSHOT_REBUILD_DURATION_SECONDS.observe(duration.as_secs_f64());
}

pub fn set_snapshot_hotels(count: usize) {
    SNAPSHOT_HOTELS.set(count as i64);
}

pub fn observe_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    let status_label = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status_label])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path, &status_label])
        .observe(elapsed.as_secs_f64());
}

pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
