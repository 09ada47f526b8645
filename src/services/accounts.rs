//! Dashboard account registration and login.

use actix_web::web;
use tracing::{info, warn};

use crate::config::SessionSettings;
use crate::db::{DbPool, users};
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::services::{password, session};

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 255;

/// Validate registration input, returning trimmed username and email.
pub fn validate_registration(req: &RegisterRequest) -> AppResult<(String, String)> {
    let username = req.username.trim();
    let username_len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username_len) {
        return Err(AppError::InvalidInput(format!(
            "Username must be between {} and {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }

    let email = req.email.trim();
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_email || email.len() > MAX_EMAIL_LENGTH {
        return Err(AppError::InvalidInput(
            "A valid email address is required".to_string(),
        ));
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok((username.to_string(), email.to_string()))
}

/// Register a new user and issue a session token.
pub async fn register(
    pool: &DbPool,
    settings: &SessionSettings,
    req: RegisterRequest,
) -> AppResult<(String, User)> {
    let (username, email) = validate_registration(&req)?;

    if users::find_by_username(pool.connection(), &username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            username
        )));
    }

    let password = req.password;
    let password_hash = web::block(move || password::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

    let user = users::insert_user(pool.connection(), &username, &email, &password_hash).await?;
    info!(user_id = %user.id, "User registered: {}", user.username);

    let token = session::create_session_token(&user.id, &user.username, settings)?;
    Ok((token, user))
}

/// Check credentials and issue a session token.
pub async fn login(
    pool: &DbPool,
    settings: &SessionSettings,
    req: LoginRequest,
) -> AppResult<(String, User)> {
    let invalid = || AppError::Unauthorized("Invalid username or password".to_string());

    let user = users::find_by_username(pool.connection(), req.username.trim())
        .await?
        .ok_or_else(|| {
            warn!("Login failed: unknown user");
            invalid()
        })?;

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let matches = web::block(move || password::verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))??;

    if !matches {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "User logged in: {}", user.username);
    let token = session::create_session_token(&user.id, &user.username, settings)?;
    Ok((token, user))
}
