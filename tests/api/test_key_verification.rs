//! API key verification tests for the country routes.

use actix_web::test;
use chrono::{Duration, Utc};
use countries_gateway_lib::db::api_keys;
use countries_gateway_lib::services::api_key::generate_key;

use super::mock_upstream::MockUpstream;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_missing_key_is_unauthorized() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;

    let req = test::TestRequest::get().uri("/api/countries").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 401, "{}", body);
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(body["message"], "API key is required");
}

#[actix_rt::test]
async fn test_unknown_key_is_not_found() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;

    let (status, body) = get_with_key(
        &app,
        "cgw_0000000000000000000000000000000000000000000000000000000000000000",
        "/api/countries",
    )
    .await;
    assert_eq!(status, 404, "{}", body);
    assert_eq!(body["message"], "Invalid API key");
}

#[actix_rt::test]
async fn test_toggled_off_key_is_forbidden() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("mia")).await;
    let (key, key_id) = create_named_key(&app, &token, "switch").await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/keys/{}/toggle", key_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let (status, body) = get_with_key(&app, &key, "/api/countries").await;
    assert_eq!(status, 403, "{}", body);
    assert_eq!(body["error"], "FORBIDDEN");
    assert_eq!(body["message"], "API key is inactive");

    // Re-enable and make one accepted call; only that one may be counted
    let req = test::TestRequest::patch()
        .uri(&format!("/api/keys/{}/toggle", key_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let (status, _) = get_with_key(&app, &key, "/api/countries").await;
    assert_eq!(status, 200);

    let body = wait_for_usage(&app, &token, &key_id, 1).await;
    // Give any stray background record time to land before re-checking
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let (_, again) = get_with_token(&app, &token, &format!("/api/keys/{}/usage", key_id)).await;
    assert_eq!(body["usage_count"], 1);
    assert_eq!(again["usage_count"], 1);
    assert_eq!(again["logs"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn test_expired_key_is_forbidden() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (_, user_id) = register_user(&app, &unique_username("noah")).await;

    let (key, mut record) = generate_key(&user_id, "stale", 1);
    record.expires_at = Some(Utc::now() - Duration::hours(1));
    api_keys::insert_api_key(pool.connection(), &record)
        .await
        .expect("insert expired key");

    let (status, body) = get_with_key(&app, &key, "/api/countries").await;
    assert_eq!(status, 403, "{}", body);
    assert_eq!(body["message"], "API key has expired");
}

#[actix_rt::test]
async fn test_usage_count_increments_once_per_call() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("olga")).await;
    let (key, key_id) = create_named_key(&app, &token, "counter").await;

    let (status, _) = get_with_key(&app, &key, "/api/countries").await;
    assert_eq!(status, 200);
    let body = wait_for_usage(&app, &token, &key_id, 1).await;
    assert!(body["last_used_at"].is_string());

    let (status, _) = get_with_key(&app, &key, "/api/countries/code/fr").await;
    assert_eq!(status, 200);
    let body = wait_for_usage(&app, &token, &key_id, 2).await;

    // Newest first
    assert_eq!(body["logs"][0]["endpoint"], "/api/countries/code/fr");
    assert_eq!(body["logs"][1]["endpoint"], "/api/countries");
}

#[actix_rt::test]
async fn test_key_accepted_from_query_parameter() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("pete")).await;
    let (key, key_id) = create_named_key(&app, &token, "query").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/countries/region/europe?api_key={}", key))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["count"], 2);

    wait_for_usage(&app, &token, &key_id, 1).await;
}

#[actix_rt::test]
async fn test_concurrent_calls_are_all_counted() {
    const CALLS: usize = 20;

    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("quinn")).await;
    let (key, key_id) = create_named_key(&app, &token, "busy").await;

    let calls = (0..CALLS).map(|_| get_with_key(&app, &key, "/api/countries/code/fr"));
    let results = futures_util::future::join_all(calls).await;
    assert!(results.iter().all(|(status, _)| *status == 200));

    let body = wait_for_usage(&app, &token, &key_id, CALLS as i64).await;
    assert_eq!(body["usage_count"], CALLS);
    assert_eq!(body["logs"].as_array().map(Vec::len), Some(CALLS));
}
