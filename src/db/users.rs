//! Database operations for users.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::User;

/// Insert a new user. Fails with `Conflict` when the username is taken.
pub async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<User> {
    let now = Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match model.insert(db).await {
        Ok(inserted) => Ok(model_to_user(inserted)),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            ))),
            _ => Err(err.into()),
        },
    }
}

/// Find a user by username.
pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> AppResult<Option<User>> {
    let result = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(result.map(model_to_user))
}

/// Find a user by ID.
pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> AppResult<Option<User>> {
    let uuid = match Uuid::parse_str(id).ok() {
        Some(u) => u,
        None => return Ok(None),
    };

    let result = user::Entity::find_by_id(uuid).one(db).await?;

    Ok(result.map(model_to_user))
}

fn model_to_user(m: user::Model) -> User {
    User {
        id: m.id.to_string(),
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        created_at: m.created_at,
    }
}
