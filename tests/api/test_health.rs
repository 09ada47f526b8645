//! Liveness and readiness tests.

use actix_web::test;
use countries_gateway_lib::config::DatabaseSettings;
use countries_gateway_lib::db::DbPool;

use super::mock_upstream::MockUpstream;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_and_ready_on_migrated_store() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["service"], "countries-gateway-server");

    let req = test::TestRequest::get().uri("/api/ready").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["database"], "connected");
    assert_eq!(body["applied_migrations"], 3);
}

#[actix_rt::test]
async fn test_not_ready_until_migrated() {
    let pool = DbPool::connect(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .expect("Failed to open in-memory database");
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;

    let req = test::TestRequest::get().uri("/api/ready").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 503, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "NOT_READY");
    assert_eq!(body["message"], "3 database migration(s) pending");
}
