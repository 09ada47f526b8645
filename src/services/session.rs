//! Dashboard session tokens (HS256 JWT).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;

use crate::config::SessionSettings;
use crate::error::{AppError, AppResult};
use crate::models::SessionClaims;

/// Session JWT issuer.
pub const SESSION_ISSUER: &str = "countries-gateway";

/// Create a signed session token for a user.
pub fn create_session_token(
    user_id: &str,
    username: &str,
    settings: &SessionSettings,
) -> AppResult<String> {
    let now = chrono::Utc::now();
    let exp = i64::try_from(settings.token_ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Session lifetime of {}s is out of range",
                settings.token_ttl_secs
            ))
        })?;

    let claims = SessionClaims {
        sub: user_id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user_id.to_string(),
        username: username.to_string(),
    };

    let key = EncodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))
}

/// Verify a session token and return its claims.
pub fn verify_session_token(token: &str, settings: &SessionSettings) -> Result<SessionClaims, String> {
    let key = DecodingKey::from_secret(settings.jwt_secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| format!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}
