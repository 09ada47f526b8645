//! API key management tests: create, list, toggle, delete, usage and logs.

use actix_web::test;
use serde_json::json;

use super::mock_upstream::MockUpstream;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_created_key_is_shown_once_then_masked() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let (token, _) = register_user(&app, &unique_username("erin")).await;

    let (status, body) = create_key(&app, &token, json!({"name": "  Mobile app  "})).await;
    assert_eq!(status, 201, "{}", body);
    let key = body["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("cgw_"));
    assert_eq!(key.len(), 4 + 64);
    assert_eq!(body["name"], "Mobile app");
    assert_eq!(body["key_prefix"], &key[..12]);
    // Default expiry is 30 days out
    assert!(body["expires_at"].is_string());

    let (status, body) = get_with_token(&app, &token, "/api/keys").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
    let item = &body["keys"][0];
    assert_eq!(item["key"], format!("{}...", &key[..12]));
    assert_eq!(item["is_active"], true);
    assert_eq!(item["is_expired"], false);
    assert_eq!(item["usage_count"], 0);
    assert!(!body.to_string().contains(&key));
}

#[actix_rt::test]
async fn test_expiry_days_zero_never_expires() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let (token, _) = register_user(&app, &unique_username("frank")).await;

    let (status, body) = create_key(&app, &token, json!({"name": "forever", "expiryDays": 0})).await;
    assert_eq!(status, 201, "{}", body);
    assert!(body["expires_at"].is_null());

    let (_, body) = get_with_token(&app, &token, "/api/keys").await;
    assert!(body["keys"][0]["expires_at"].is_null());
    assert_eq!(body["keys"][0]["is_expired"], false);
}

#[actix_rt::test]
async fn test_create_rejects_invalid_input() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let (token, _) = register_user(&app, &unique_username("gina")).await;

    let cases = [
        json!({"name": "   "}),
        json!({"name": "x".repeat(101)}),
        json!({"name": "negative", "expiryDays": -1}),
        json!({"name": "too long", "expiryDays": 3651}),
    ];

    for case in cases {
        let (status, body) = create_key(&app, &token, case.clone()).await;
        assert_eq!(status, 400, "{} should be rejected: {}", case, body);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    let (_, body) = get_with_token(&app, &token, "/api/keys").await;
    assert_eq!(body["count"], 0);
}

#[actix_rt::test]
async fn test_keys_are_scoped_to_their_owner() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let (owner_token, _) = register_user(&app, &unique_username("hank")).await;
    let (other_token, _) = register_user(&app, &unique_username("iris")).await;
    let (_, key_id) = create_named_key(&app, &owner_token, "owned").await;

    let (_, body) = get_with_token(&app, &other_token, "/api/keys").await;
    assert_eq!(body["count"], 0);

    let (status, _) =
        get_with_token(&app, &other_token, &format!("/api/keys/{}/usage", key_id)).await;
    assert_eq!(status, 404);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/keys/{}/toggle", key_id))
        .insert_header(("Authorization", format!("Bearer {}", other_token)))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/keys/{}", key_id))
        .insert_header(("Authorization", format!("Bearer {}", other_token)))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);

    let (_, body) = get_with_token(&app, &owner_token, "/api/keys").await;
    assert_eq!(body["count"], 1);
}

#[actix_rt::test]
async fn test_toggle_flips_active_flag() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let (token, _) = register_user(&app, &unique_username("jack")).await;
    let (_, key_id) = create_named_key(&app, &token, "toggled").await;

    for expected in [false, true] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/keys/{}/toggle", key_id))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 200, "{}", body);
        assert_eq!(body["key"]["is_active"], expected);
    }
}

#[actix_rt::test]
async fn test_delete_keeps_usage_logs() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("kate")).await;
    let (key, key_id) = create_named_key(&app, &token, "short lived").await;

    for uri in ["/api/countries/name/france", "/api/countries/region/europe"] {
        let (status, body) = get_with_key(&app, &key, uri).await;
        assert_eq!(status, 200, "{}", body);
    }
    wait_for_usage(&app, &token, &key_id, 2).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/keys/{}", key_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["id"], key_id.as_str());

    let (_, body) = get_with_token(&app, &token, "/api/keys").await;
    assert_eq!(body["count"], 0);

    let body = wait_for_logs(&app, &token, 2).await;
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l["key_id"] == key_id.as_str()));
    assert!(logs.iter().all(|l| l["key_name"] == "short lived"));
    assert!(logs.iter().all(|l| l["key_value"] == format!("{}...", &key[..12])));
    let endpoints: Vec<&str> = logs.iter().filter_map(|l| l["endpoint"].as_str()).collect();
    assert!(endpoints.contains(&"/api/countries/name/france"));
    assert!(endpoints.contains(&"/api/countries/region/europe"));
}

#[actix_rt::test]
async fn test_usage_logs_are_paginated() {
    let mock = MockUpstream::start().await;
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &mock.base_url).await;
    let (token, _) = register_user(&app, &unique_username("liam")).await;
    let (key, key_id) = create_named_key(&app, &token, "paged").await;

    for _ in 0..3 {
        let (status, _) = get_with_key(&app, &key, "/api/countries").await;
        assert_eq!(status, 200);
    }
    wait_for_usage(&app, &token, &key_id, 3).await;

    let (status, body) = get_with_token(&app, &token, "/api/keys/logs?page=2&limit=2").await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let (status, body) = get_with_token(&app, &token, "/api/keys/logs?page=abc").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}
