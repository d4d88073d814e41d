mod common;

use common::{
    service, InMemoryBookings, InMemoryHotels, InMemoryIdentities, MAPPED_UUID, UNMAPPED_UUID,
};
use hotel_recommendation_service::error::AppError;
use hotel_recommendation_service::services::FactorModel;
use std::io::Write;
use std::sync::Arc;

fn factor_service() -> hotel_recommendation_service::RecommendationService {
    service(
        Arc::new(InMemoryHotels::default()),
        InMemoryBookings::default(),
        InMemoryIdentities::default().with(MAPPED_UUID, "user_1"),
    )
}

#[test]
fn test_tie_goes_to_lowest_hotel_index() {
    let resp = factor_service().recommend_factor("user_0", 1).unwrap();
    assert_eq!(resp.user_id, "user_0");
    assert_eq!(resp.recommended_hotel_ids, vec![101]);
}

#[test]
fn test_unknown_model_user_is_not_found() {
    let err = factor_service().recommend_factor("user_9", 5).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_recommend_by_uuid_uses_mapped_user() {
    let resp = factor_service()
        .recommend_factor_by_identity(MAPPED_UUID, 2)
        .await
        .unwrap();

    assert_eq!(resp.user_id, "user_1");
    assert_eq!(resp.recommended_hotel_ids, vec![102, 103]);
}

#[tokio::test]
async fn test_recommend_by_uppercase_uuid() {
    let resp = factor_service()
        .recommend_factor_by_identity(&MAPPED_UUID.to_uppercase(), 2)
        .await
        .unwrap();

    assert_eq!(resp.user_id, "user_1");
    assert_eq!(resp.recommended_hotel_ids, vec![102, 103]);
}

#[tokio::test]
async fn test_unmapped_uuid_is_not_found() {
    let err = factor_service()
        .recommend_factor_by_identity(UNMAPPED_UUID, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_load_from_json_artifact() {
    let artifact = serde_json::json!({
        "user_features": [[0.5, 0.1], [0.0, 2.0]],
        "hotel_features": [[1.0, 0.0, 0.3], [0.0, 1.0, 0.3]],
        "user_ids": ["user_0", "user_1"],
        "hotel_ids": [11, 12, 13]
    });

    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(artifact.to_string().as_bytes()).unwrap();

    let model = FactorModel::load(file.path()).unwrap();
    assert_eq!(model.info().factor_count, 2);
    assert_eq!(model.recommend("user_1", 3).unwrap(), vec![12, 13, 11]);
}
