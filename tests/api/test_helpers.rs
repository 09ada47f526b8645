//! Shared test helpers for the API test suite.

use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use countries_gateway_lib::api;
use countries_gateway_lib::config::{DatabaseSettings, SessionSettings, UpstreamSettings};
use countries_gateway_lib::db::DbPool;
use countries_gateway_lib::services::CountryClient;
use secrecy::SecretString;
use serde_json::{Value, json};
use uuid::Uuid;

/// Session signing secret used in tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-the-api-suite-0123456789";

/// Password used for every test account.
pub const TEST_PASSWORD: &str = "hunter22";

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        jwt_secret: SecretString::from(TEST_JWT_SECRET.to_string()),
        token_ttl_secs: 3600,
    }
}

/// Create a fresh in-memory database with migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> DbPool {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    let pool = DbPool::connect(&settings)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Generate a unique username for test isolation.
pub fn unique_username(prefix: &str) -> String {
    format!(
        "{}_{}",
        prefix,
        Uuid::new_v4().simple().to_string().get(..8).unwrap()
    )
}

/// Create a test app wired the same way as the server.
pub async fn create_test_app(
    pool: &DbPool,
    upstream_url: &str,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> + use<> {
    let client = CountryClient::new(&UpstreamSettings {
        base_url: upstream_url.to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    })
    .expect("Failed to build country client");

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(session_settings()))
            .app_data(web::Data::new(client))
            .app_data(api::json_config())
            .app_data(api::query_config())
            .service(web::scope("/api").configure(api::configure_api)),
    )
    .await
}

/// Call the app and decode the body as JSON (`Null` when empty or not JSON).
pub async fn call_json<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Register a user and return (token, user id).
pub async fn register_user<S>(app: &S, username: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
        }))
        .to_request();

    let (status, body) = call_json(app, req).await;
    assert_eq!(status, 201, "Registration failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Create an API key through the HTTP API.
pub async fn create_key<S>(app: &S, token: &str, body: Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/keys")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(body)
        .to_request();
    call_json(app, req).await
}

/// Create a key and return (plaintext key, key id).
pub async fn create_named_key<S>(app: &S, token: &str, name: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = create_key(app, token, json!({ "name": name })).await;
    assert_eq!(status, 201, "Key creation failed: {}", body);
    (
        body["key"].as_str().unwrap().to_string(),
        body["id"].as_str().unwrap().to_string(),
    )
}

/// GET with a bearer token.
pub async fn get_with_token<S>(app: &S, token: &str, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    call_json(app, req).await
}

/// GET with an API key header.
pub async fn get_with_key<S>(app: &S, key: &str, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("X-API-Key", key))
        .to_request();
    call_json(app, req).await
}

/// Wait until the background usage record brings the key to `expected` uses.
pub async fn wait_for_usage<S>(app: &S, token: &str, key_id: &str, expected: i64) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let uri = format!("/api/keys/{}/usage", key_id);
    let mut last = Value::Null;
    for _ in 0..100 {
        let (status, body) = get_with_token(app, token, &uri).await;
        assert_eq!(status, 200, "Usage lookup failed: {}", body);
        if body["usage_count"].as_i64() == Some(expected)
            && body["logs"].as_array().map(Vec::len) == Some(expected as usize)
        {
            return body;
        }
        last = body;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Usage never reached {}: {}", expected, last);
}

/// Wait until the caller's usage logs reach `expected` entries.
pub async fn wait_for_logs<S>(app: &S, token: &str, expected: u64) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut last = Value::Null;
    for _ in 0..100 {
        let (status, body) = get_with_token(app, token, "/api/keys/logs").await;
        assert_eq!(status, 200, "Log lookup failed: {}", body);
        if body["pagination"]["total"].as_u64() == Some(expected) {
            return body;
        }
        last = body;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("Logs never reached {}: {}", expected, last);
}
