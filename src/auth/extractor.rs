//! Actix-web extractors for API key and session authentication.
//!
//! # Security
//! - Provided API keys are wrapped in `SecretString` as soon as they are read
//! - Secret values are never logged or exposed in debug output
//! - Session settings come from app data registered at startup

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::future::{Ready, ready};

use crate::config::{API_KEY_HEADER, SessionSettings};
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::{SessionUser, VerifiedKey};
use crate::services::{api_key, session};

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing, empty or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| SecretString::from(s.to_string()))
}

#[derive(Deserialize)]
struct ApiKeyQuery {
    #[serde(default)]
    api_key: Option<String>,
}

/// Read the API key from the header, falling back to the `api_key` query parameter.
fn extract_api_key(req: &HttpRequest) -> Option<SecretString> {
    extract_secret_header(req, API_KEY_HEADER).or_else(|| {
        web::Query::<ApiKeyQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().api_key)
            .filter(|k| !k.trim().is_empty())
            .map(|k| SecretString::from(k.trim().to_string()))
    })
}

/// Extractor that requires a valid, active, unexpired API key.
///
/// Successful extraction records one usage of the key for the request path.
/// ```ignore
/// async fn protected_handler(auth: ApiKeyAuth) -> impl Responder {
///     // auth.key identifies the verified key
/// }
/// ```
pub struct ApiKeyAuth {
    pub key: VerifiedKey,
}

impl FromRequest for ApiKeyAuth {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let provided: Option<SecretString> = extract_api_key(req);
        let endpoint = req.path().to_string();

        Box::pin(async move {
            let pool = pool
                .ok_or_else(|| AppError::Internal("Database pool not configured".to_string()))?;

            let key = provided
                .ok_or_else(|| AppError::Unauthorized("API key is required".to_string()))?;

            let verified = api_key::verify_key(pool.get_ref(), key.expose_secret(), &endpoint).await?;
            Ok(ApiKeyAuth { key: verified })
        })
    }
}

/// Extractor that requires a valid dashboard session token
/// (`Authorization: Bearer <token>`).
pub struct SessionAuth {
    pub user: SessionUser,
}

impl FromRequest for SessionAuth {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let settings = match req.app_data::<web::Data<SessionSettings>>() {
            Some(settings) => settings,
            None => {
                return ready(Err(AppError::Internal(
                    "Session settings not configured".to_string(),
                )));
            }
        };

        let token = extract_secret_header(req, header::AUTHORIZATION.as_str()).and_then(|v| {
            v.expose_secret()
                .strip_prefix("Bearer ")
                .map(|t| SecretString::from(t.trim().to_string()))
        });

        let Some(token) = token else {
            return ready(Err(AppError::Unauthorized(
                "Missing bearer token".to_string(),
            )));
        };

        match session::verify_session_token(token.expose_secret(), settings.get_ref()) {
            Ok(claims) => ready(Ok(SessionAuth {
                user: SessionUser {
                    user_id: claims.user_id,
                    username: claims.username,
                },
            })),
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                ready(Err(AppError::Unauthorized(
                    "Invalid or expired session token".to_string(),
                )))
            }
        }
    }
}
