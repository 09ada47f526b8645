//! API key service for generation, verification, usage accounting and management.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info};

use crate::db::{DbPool, api_keys as db, usage_logs};
use crate::error::{AppError, AppResult};
use crate::models::{ApiKey, CreateApiKeyRequest, PaginationParams, UsageLogEntry, VerifiedKey};

/// API key prefix.
const KEY_PREFIX: &str = "cgw_";
/// Random bytes per key (hex-encoded into the key).
const KEY_RANDOM_BYTES: usize = 32;
/// Length of the key prefix stored for identification.
const KEY_PREFIX_LENGTH: usize = 12;
/// Expiry applied when the request does not specify one.
pub const DEFAULT_EXPIRY_DAYS: i64 = 30;
/// Upper bound for `expiryDays`.
pub const MAX_EXPIRY_DAYS: i64 = 3650;
const MAX_NAME_LENGTH: usize = 100;
const MAX_ENDPOINT_LENGTH: usize = 512;
/// Logs returned by the per-key usage endpoint.
const KEY_USAGE_LOG_LIMIT: u64 = 100;

/// Generate a new random API key.
///
/// Returns the full key (to be shown to user once) and the key data for storage.
pub fn generate_key(user_id: &str, name: &str, expiry_days: i64) -> (String, ApiKey) {
    let random_bytes: [u8; KEY_RANDOM_BYTES] = rand::random();
    let full_key = format!("{}{}", KEY_PREFIX, hex::encode(random_bytes));

    let key_hash = hash_key(&full_key);
    let key_prefix = full_key.chars().take(KEY_PREFIX_LENGTH).collect::<String>();

    let now = Utc::now();
    let api_key = ApiKey {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        key_hash,
        key_prefix,
        is_active: true,
        usage_count: 0,
        expires_at: expiry_from_days(expiry_days, now),
        last_used_at: None,
        created_at: now,
    };

    (full_key, api_key)
}

/// Hash an API key using SHA-256.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Expiry instant for `days` from `now`; 0 means the key never expires.
fn expiry_from_days(days: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if days == 0 {
        return None;
    }
    Duration::try_days(days).map(|d| now + d)
}

/// Validate a create request, returning the trimmed name and expiry in days.
pub fn validate_create_request(req: &CreateApiKeyRequest) -> AppResult<(String, i64)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }

    let expiry_days = req.expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS);
    if !(0..=MAX_EXPIRY_DAYS).contains(&expiry_days) {
        return Err(AppError::InvalidInput(format!(
            "expiryDays must be between 0 and {}",
            MAX_EXPIRY_DAYS
        )));
    }

    Ok((name.to_string(), expiry_days))
}

/// Verify an API key for a call to `endpoint`.
///
/// On success the usage is recorded by a background task; the caller does not
/// wait for it.
pub async fn verify_key(pool: &DbPool, key: &str, endpoint: &str) -> AppResult<VerifiedKey> {
    let key_hash = hash_key(key);

    let api_key = db::find_by_hash(pool.connection(), &key_hash)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid API key".to_string()))?;

    if !api_key.is_active {
        return Err(AppError::Forbidden("API key is inactive".to_string()));
    }

    if api_key.is_expired() {
        return Err(AppError::Forbidden("API key has expired".to_string()));
    }

    let verified = VerifiedKey {
        masked_key: api_key.masked_key(),
        key_id: api_key.id,
        user_id: api_key.user_id,
        name: api_key.name,
    };

    spawn_usage_record(pool.clone(), verified.clone(), endpoint.to_string());

    Ok(verified)
}

/// Record a key use without blocking the current request.
fn spawn_usage_record(pool: DbPool, key: VerifiedKey, endpoint: String) {
    tokio::spawn(async move {
        if let Err(e) = record_usage(&pool, &key, &endpoint, Utc::now()).await {
            error!(key_id = %key.key_id, "Failed to record API key usage: {}", e);
        }
    });
}

/// Increment the key's counter and append a usage log entry.
pub async fn record_usage(
    pool: &DbPool,
    key: &VerifiedKey,
    endpoint: &str,
    used_at: DateTime<Utc>,
) -> AppResult<()> {
    let conn = pool.connection();

    // The key may have been deleted since verification; the log row is kept regardless.
    if !db::record_use(conn, &key.key_id, used_at).await? {
        debug!(key_id = %key.key_id, "Usage recorded for a key that no longer exists");
    }

    let entry = UsageLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        key_id: key.key_id.clone(),
        user_id: key.user_id.clone(),
        key_name: key.name.clone(),
        key_value: key.masked_key.clone(),
        endpoint: endpoint.chars().take(MAX_ENDPOINT_LENGTH).collect(),
        requested_at: used_at,
    };
    usage_logs::insert(conn, &entry).await
}

/// Create a new API key for `user_id` and store it in the database.
pub async fn create_key(
    pool: &DbPool,
    user_id: &str,
    req: &CreateApiKeyRequest,
) -> AppResult<(String, ApiKey)> {
    let (name, expiry_days) = validate_create_request(req)?;
    let (full_key, api_key) = generate_key(user_id, &name, expiry_days);

    db::insert_api_key(pool.connection(), &api_key).await?;

    info!(
        key_id = %api_key.id,
        user_id = %user_id,
        "API key created (expires: {})",
        api_key
            .expires_at
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );

    Ok((full_key, api_key))
}

/// List the API keys owned by a user.
pub async fn list_keys(pool: &DbPool, user_id: &str) -> AppResult<Vec<ApiKey>> {
    db::list_by_user(pool.connection(), user_id).await
}

/// List every API key (admin tooling).
pub async fn list_all_keys(pool: &DbPool) -> AppResult<Vec<ApiKey>> {
    db::list_all(pool.connection()).await
}

/// Flip the active flag of an owned key.
pub async fn toggle_key(pool: &DbPool, id: &str, user_id: &str) -> AppResult<ApiKey> {
    let key = db::toggle_active(pool.connection(), id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("API key {} not found", id)))?;

    info!(key_id = %key.id, active = key.is_active, "API key toggled");
    Ok(key)
}

/// Delete an owned key. Its usage logs are kept.
pub async fn delete_key(pool: &DbPool, id: &str, user_id: &str) -> AppResult<()> {
    if db::delete_owned(pool.connection(), id, user_id).await? {
        info!(key_id = %id, "API key deleted");
        Ok(())
    } else {
        Err(AppError::NotFound(format!("API key {} not found", id)))
    }
}

/// Usage counters and recent logs for one owned key.
pub async fn key_usage(
    pool: &DbPool,
    id: &str,
    user_id: &str,
) -> AppResult<(ApiKey, Vec<UsageLogEntry>)> {
    let key = db::find_owned(pool.connection(), id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("API key {} not found", id)))?;

    let logs = usage_logs::list_by_key(pool.connection(), &key.id, KEY_USAGE_LOG_LIMIT).await?;

    Ok((key, logs))
}

/// Page through all usage logs of a user.
pub async fn list_logs(
    pool: &DbPool,
    user_id: &str,
    params: &PaginationParams,
) -> AppResult<(Vec<UsageLogEntry>, u64)> {
    usage_logs::list_by_user(
        pool.connection(),
        user_id,
        params.offset(),
        u64::from(params.clamped_limit()),
    )
    .await
}

/// Reactivate every inactive key, optionally for one user only.
pub async fn activate_all(pool: &DbPool, user_id: Option<&str>) -> AppResult<u64> {
    let count = db::activate_all(pool.connection(), user_id).await?;
    info!("Reactivated {} API key(s)", count);
    Ok(count)
}
