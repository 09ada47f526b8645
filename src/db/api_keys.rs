//! Database operations for API keys using SeaORM.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;
use uuid::Uuid;

use crate::entity::api_key;
use crate::error::AppResult;
use crate::models::ApiKey;

/// Insert a new API key.
pub async fn insert_api_key(db: &DatabaseConnection, key: &ApiKey) -> AppResult<()> {
    let model = api_key::ActiveModel {
        id: Set(Uuid::parse_str(&key.id)?),
        user_id: Set(Uuid::parse_str(&key.user_id)?),
        name: Set(key.name.clone()),
        key_hash: Set(key.key_hash.clone()),
        key_prefix: Set(key.key_prefix.clone()),
        is_active: Set(key.is_active),
        usage_count: Set(key.usage_count),
        expires_at: Set(key.expires_at),
        last_used_at: Set(key.last_used_at),
        created_at: Set(key.created_at),
    };

    api_key::Entity::insert(model).exec(db).await?;

    Ok(())
}

/// Find an API key by its hash.
pub async fn find_by_hash(db: &DatabaseConnection, key_hash: &str) -> AppResult<Option<ApiKey>> {
    let result = api_key::Entity::find()
        .filter(api_key::Column::KeyHash.eq(key_hash))
        .one(db)
        .await?;

    Ok(result.map(model_to_api_key))
}

/// Find an API key by ID, only if it belongs to `user_id`.
pub async fn find_owned(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> AppResult<Option<ApiKey>> {
    let (Ok(id), Ok(user_id)) = (Uuid::parse_str(id), Uuid::parse_str(user_id)) else {
        return Ok(None);
    };

    let result = api_key::Entity::find_by_id(id)
        .filter(api_key::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    Ok(result.map(model_to_api_key))
}

/// List a user's API keys, newest first.
pub async fn list_by_user(db: &DatabaseConnection, user_id: &str) -> AppResult<Vec<ApiKey>> {
    let Ok(user_id) = Uuid::parse_str(user_id) else {
        return Ok(Vec::new());
    };

    let results = api_key::Entity::find()
        .filter(api_key::Column::UserId.eq(user_id))
        .order_by_desc(api_key::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_api_key).collect())
}

/// List every API key, newest first.
pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<ApiKey>> {
    let results = api_key::Entity::find()
        .order_by_desc(api_key::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(results.into_iter().map(model_to_api_key).collect())
}

/// Flip the active flag of an owned key. Returns the updated key.
pub async fn toggle_active(
    db: &DatabaseConnection,
    id: &str,
    user_id: &str,
) -> AppResult<Option<ApiKey>> {
    let (Ok(id), Ok(user_id)) = (Uuid::parse_str(id), Uuid::parse_str(user_id)) else {
        return Ok(None);
    };

    let model = api_key::Entity::find_by_id(id)
        .filter(api_key::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match model {
        Some(m) => {
            let next = !m.is_active;
            let mut active: api_key::ActiveModel = m.into();
            active.is_active = Set(next);
            let updated = active.update(db).await?;
            Ok(Some(model_to_api_key(updated)))
        }
        None => Ok(None),
    }
}

/// Delete an owned key. Usage logs are not touched.
pub async fn delete_owned(db: &DatabaseConnection, id: &str, user_id: &str) -> AppResult<bool> {
    let (Ok(id), Ok(user_id)) = (Uuid::parse_str(id), Uuid::parse_str(user_id)) else {
        return Ok(false);
    };

    let result = api_key::Entity::delete_many()
        .filter(api_key::Column::Id.eq(id))
        .filter(api_key::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Count one use of a key: `usage_count + 1` and `last_used_at = used_at`.
///
/// Single UPDATE statement, so concurrent uses never overwrite each other.
pub async fn record_use(db: &DatabaseConnection, id: &str, used_at: DateTime<Utc>) -> AppResult<bool> {
    let id = Uuid::parse_str(id)?;

    let result = api_key::Entity::update_many()
        .col_expr(
            api_key::Column::UsageCount,
            Expr::col(api_key::Column::UsageCount).add(1),
        )
        .col_expr(api_key::Column::LastUsedAt, Expr::value(Some(used_at)))
        .filter(api_key::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Mark inactive keys active again, optionally for one user only.
pub async fn activate_all(db: &DatabaseConnection, user_id: Option<&str>) -> AppResult<u64> {
    let mut query = api_key::Entity::update_many()
        .col_expr(api_key::Column::IsActive, Expr::value(true))
        .filter(api_key::Column::IsActive.eq(false));

    if let Some(user_id) = user_id {
        query = query.filter(api_key::Column::UserId.eq(Uuid::parse_str(user_id)?));
    }

    let result = query.exec(db).await?;

    Ok(result.rows_affected)
}

fn model_to_api_key(m: api_key::Model) -> ApiKey {
    ApiKey {
        id: m.id.to_string(),
        user_id: m.user_id.to_string(),
        name: m.name,
        key_hash: m.key_hash,
        key_prefix: m.key_prefix,
        is_active: m.is_active,
        usage_count: m.usage_count,
        expires_at: m.expires_at,
        last_used_at: m.last_used_at,
        created_at: m.created_at,
    }
}
