//! Usage log models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::Pagination;

/// Immutable audit record of one proxied call.
#[derive(Debug, Clone)]
pub struct UsageLogEntry {
    pub id: String,
    pub key_id: String,
    pub user_id: String,
    /// Key name at the time of the call
    pub key_name: String,
    /// Masked key value at the time of the call
    pub key_value: String,
    pub endpoint: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsageLogItem {
    pub id: String,
    pub key_id: String,
    pub key_name: String,
    pub key_value: String,
    pub endpoint: String,
    pub requested_at: String,
}

impl From<UsageLogEntry> for UsageLogItem {
    fn from(e: UsageLogEntry) -> Self {
        Self {
            id: e.id,
            key_id: e.key_id,
            key_name: e.key_name,
            key_value: e.key_value,
            endpoint: e.endpoint,
            requested_at: e.requested_at.to_rfc3339(),
        }
    }
}

/// Response for GET /api/keys/logs.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageLogListResponse {
    pub success: bool,
    pub logs: Vec<UsageLogItem>,
    pub pagination: Pagination,
}

/// Response for GET /api/keys/{id}/usage.
#[derive(Debug, Serialize, ToSchema)]
pub struct KeyUsageResponse {
    pub success: bool,
    pub key_id: String,
    pub name: String,
    pub usage_count: i64,
    pub last_used_at: Option<String>,
    pub logs: Vec<UsageLogItem>,
}
