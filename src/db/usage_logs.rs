//! Database operations for API key usage logs.

use sea_orm::*;
use uuid::Uuid;

use crate::entity::usage_log;
use crate::error::AppResult;
use crate::models::UsageLogEntry;

/// Append one usage log row.
pub async fn insert(db: &DatabaseConnection, entry: &UsageLogEntry) -> AppResult<()> {
    let model = usage_log::ActiveModel {
        id: Set(Uuid::parse_str(&entry.id)?),
        key_id: Set(Uuid::parse_str(&entry.key_id)?),
        user_id: Set(Uuid::parse_str(&entry.user_id)?),
        key_name: Set(entry.key_name.clone()),
        key_value: Set(entry.key_value.clone()),
        endpoint: Set(entry.endpoint.clone()),
        requested_at: Set(entry.requested_at),
    };

    usage_log::Entity::insert(model).exec(db).await?;

    Ok(())
}

/// List a user's usage logs (including logs of deleted keys), newest first.
///
/// Returns the page of rows and the total row count.
pub async fn list_by_user(
    db: &DatabaseConnection,
    user_id: &str,
    offset: u64,
    limit: u64,
) -> AppResult<(Vec<UsageLogEntry>, u64)> {
    let Ok(user_id) = Uuid::parse_str(user_id) else {
        return Ok((Vec::new(), 0));
    };

    let base = usage_log::Entity::find().filter(usage_log::Column::UserId.eq(user_id));

    let total = base.clone().count(db).await?;

    let rows = base
        .order_by_desc(usage_log::Column::RequestedAt)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok((rows.into_iter().map(model_to_entry).collect(), total))
}

/// List logs recorded for a single key, newest first.
pub async fn list_by_key(
    db: &DatabaseConnection,
    key_id: &str,
    limit: u64,
) -> AppResult<Vec<UsageLogEntry>> {
    let Ok(key_id) = Uuid::parse_str(key_id) else {
        return Ok(Vec::new());
    };

    let rows = usage_log::Entity::find()
        .filter(usage_log::Column::KeyId.eq(key_id))
        .order_by_desc(usage_log::Column::RequestedAt)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(model_to_entry).collect())
}

fn model_to_entry(m: usage_log::Model) -> UsageLogEntry {
    UsageLogEntry {
        id: m.id.to_string(),
        key_id: m.key_id.to_string(),
        user_id: m.user_id.to_string(),
        key_name: m.key_name,
        key_value: m.key_value,
        endpoint: m.endpoint,
        requested_at: m.requested_at,
    }
}
