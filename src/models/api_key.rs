//! API key models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API key stored in database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier (UUID)
    pub id: String,
    /// Owning user (UUID)
    pub user_id: String,
    /// Human-readable name (e.g., "Mobile app")
    pub name: String,
    /// SHA-256 hash of the full key
    pub key_hash: String,
    /// Leading characters of the key for identification
    pub key_prefix: String,
    pub is_active: bool,
    pub usage_count: i64,
    /// Expiration timestamp (None = never expires)
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Check if the key has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Check if the key has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Redacted form of the key shown after creation.
    pub fn masked_key(&self) -> String {
        mask_prefix(&self.key_prefix)
    }
}

/// Render a stored key prefix as a masked key.
pub fn mask_prefix(prefix: &str) -> String {
    format!("{}...", prefix)
}

/// Request to create a new API key.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateApiKeyRequest {
    pub name: String,
    /// Days until expiry; 0 means never. Defaults to 30.
    #[serde(default, rename = "expiryDays", alias = "expiry_days")]
    pub expiry_days: Option<i64>,
}

/// Response when creating a new API key (includes the full key).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyCreateResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
    /// Full key - only shown once
    pub key: String,
    pub name: String,
    pub key_prefix: String,
    pub expires_at: Option<String>,
    pub created_at: String,
}

/// API key as listed to its owner (key masked).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyListItem {
    pub id: String,
    pub name: String,
    pub key: String,
    pub key_prefix: String,
    pub is_active: bool,
    pub is_expired: bool,
    pub usage_count: i64,
    pub expires_at: Option<String>,
    pub last_used_at: Option<String>,
    pub created_at: String,
}

impl From<ApiKey> for ApiKeyListItem {
    fn from(key: ApiKey) -> Self {
        Self {
            key: key.masked_key(),
            is_expired: key.is_expired(),
            id: key.id,
            name: key.name,
            key_prefix: key.key_prefix,
            is_active: key.is_active,
            usage_count: key.usage_count,
            expires_at: key.expires_at.map(|d| d.to_rfc3339()),
            last_used_at: key.last_used_at.map(|d| d.to_rfc3339()),
            created_at: key.created_at.to_rfc3339(),
        }
    }
}

/// Response for listing API keys.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyListResponse {
    pub success: bool,
    pub count: usize,
    pub keys: Vec<ApiKeyListItem>,
}

/// Response wrapping a single key (toggle).
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    pub success: bool,
    pub message: String,
    pub key: ApiKeyListItem,
}

/// Response for deleting a key.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteApiKeyResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
}

/// Key that passed verification for the current request.
#[derive(Debug, Clone)]
pub struct VerifiedKey {
    pub key_id: String,
    pub user_id: String,
    pub name: String,
    pub masked_key: String,
}
