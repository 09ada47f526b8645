//! Registration, login and session tests.

use actix_web::test;
use serde_json::json;

use super::mock_upstream::MockUpstream;
use super::test_helpers::*;

#[actix_rt::test]
async fn test_register_login_and_me() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let username = unique_username("alice");

    let (token, user_id) = register_user(&app, &username).await;

    let (status, body) = get_with_token(&app, &token, "/api/auth/me").await;
    assert_eq!(status, 200, "me failed: {}", body);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": username, "password": TEST_PASSWORD}))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "login failed: {}", body);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["id"], user_id.as_str());
}

#[actix_rt::test]
async fn test_duplicate_username_conflicts() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let username = unique_username("bob");
    register_user(&app, &username).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": "other@example.com",
            "password": "another-password",
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 409, "{}", body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "CONFLICT");
}

#[actix_rt::test]
async fn test_register_rejects_invalid_input() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;

    let cases = [
        json!({"username": "ab", "email": "ab@example.com", "password": "secret1"}),
        json!({"username": "carol", "email": "not-an-email", "password": "secret1"}),
        json!({"username": "carol", "email": "carol@example.com", "password": "123"}),
    ];

    for case in cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&case)
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 400, "{} should be rejected: {}", case, body);
        assert_eq!(body["error"], "INVALID_INPUT");
    }
}

#[actix_rt::test]
async fn test_malformed_json_is_invalid_input() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"username\": ")
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_login_with_wrong_password() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;
    let username = unique_username("dave");
    register_user(&app, &username).await;

    for (user, password) in [(username.as_str(), "wrong-password"), ("nobody", TEST_PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": user, "password": password}))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 401, "{}", body);
        assert_eq!(body["message"], "Invalid username or password");
    }
}

#[actix_rt::test]
async fn test_session_routes_require_valid_token() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, &MockUpstream::unreachable_url()).await;

    let req = test::TestRequest::get().uri("/api/keys").to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);

    let (status, body) = get_with_token(&app, "not-a-jwt", "/api/auth/me").await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
}
