//! API key management endpoints for the signed-in user.

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    ApiKeyCreateResponse, ApiKeyListItem, ApiKeyListResponse, ApiKeyResponse,
    CreateApiKeyRequest, DeleteApiKeyResponse, KeyUsageResponse, Pagination, PaginationParams,
    UsageLogItem, UsageLogListResponse,
};
use crate::services::api_key;

/// Configure key management routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_api_keys)
        .service(create_api_key)
        .service(list_usage_logs)
        .service(toggle_api_key)
        .service(delete_api_key)
        .service(get_key_usage);
}

/// List the caller's API keys (keys masked).
///
/// GET /api/keys
#[utoipa::path(
    get,
    path = "/api/keys",
    tag = "Keys",
    responses(
        (status = 200, description = "List of API keys", body = ApiKeyListResponse),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer" = [])
    )
)]
#[get("/keys")]
pub async fn list_api_keys(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let keys = api_key::list_keys(pool.get_ref(), &auth.user.user_id).await?;
    let items: Vec<ApiKeyListItem> = keys.into_iter().map(ApiKeyListItem::from).collect();

    Ok(HttpResponse::Ok().json(ApiKeyListResponse {
        success: true,
        count: items.len(),
        keys: items,
    }))
}

/// Create a new API key. The full key is only returned here.
///
/// POST /api/keys
#[utoipa::path(
    post,
    path = "/api/keys",
    tag = "Keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key created", body = ApiKeyCreateResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer" = [])
    )
)]
#[post("/keys")]
pub async fn create_api_key(
    auth: SessionAuth,
    body: web::Json<CreateApiKeyRequest>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (full_key, api_key) = api_key::create_key(pool.get_ref(), &auth.user.user_id, &body).await?;

    Ok(HttpResponse::Created().json(ApiKeyCreateResponse {
        success: true,
        message: "API key created successfully. Make sure to copy your key now!".to_string(),
        id: api_key.id,
        key: full_key,
        name: api_key.name,
        key_prefix: api_key.key_prefix,
        expires_at: api_key.expires_at.map(|d| d.to_rfc3339()),
        created_at: api_key.created_at.to_rfc3339(),
    }))
}

/// List usage logs across all of the caller's keys, including deleted ones.
///
/// GET /api/keys/logs
#[utoipa::path(
    get,
    path = "/api/keys/logs",
    tag = "Keys",
    params(PaginationParams),
    responses(
        (status = 200, description = "Usage logs, newest first", body = UsageLogListResponse),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer" = [])
    )
)]
#[get("/keys/logs")]
pub async fn list_usage_logs(
    auth: SessionAuth,
    query: web::Query<PaginationParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let params = query.into_inner();
    let (logs, total) = api_key::list_logs(pool.get_ref(), &auth.user.user_id, &params).await?;

    Ok(HttpResponse::Ok().json(UsageLogListResponse {
        success: true,
        logs: logs.into_iter().map(UsageLogItem::from).collect(),
        pagination: Pagination::new(params.page(), params.clamped_limit(), total),
    }))
}

/// Activate or deactivate an API key.
///
/// PATCH /api/keys/{id}/toggle
#[utoipa::path(
    patch,
    path = "/api/keys/{id}/toggle",
    tag = "Keys",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 200, description = "API key toggled", body = ApiKeyResponse),
        (status = 401, description = "Missing or invalid session token"),
        (status = 404, description = "API key not found")
    ),
    security(
        ("bearer" = [])
    )
)]
#[patch("/keys/{id}/toggle")]
pub async fn toggle_api_key(
    auth: SessionAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let key = api_key::toggle_key(pool.get_ref(), &path.into_inner(), &auth.user.user_id).await?;
    let message = if key.is_active {
        "API key activated"
    } else {
        "API key deactivated"
    };

    Ok(HttpResponse::Ok().json(ApiKeyResponse {
        success: true,
        message: message.to_string(),
        key: key.into(),
    }))
}

/// Delete an API key. Its usage logs are kept.
///
/// DELETE /api/keys/{id}
#[utoipa::path(
    delete,
    path = "/api/keys/{id}",
    tag = "Keys",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 200, description = "API key deleted", body = DeleteApiKeyResponse),
        (status = 401, description = "Missing or invalid session token"),
        (status = 404, description = "API key not found")
    ),
    security(
        ("bearer" = [])
    )
)]
#[delete("/keys/{id}")]
pub async fn delete_api_key(
    auth: SessionAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    api_key::delete_key(pool.get_ref(), &id, &auth.user.user_id).await?;

    Ok(HttpResponse::Ok().json(DeleteApiKeyResponse {
        success: true,
        message: "API key deleted".to_string(),
        id,
    }))
}

/// Usage counters and recent logs for one API key.
///
/// GET /api/keys/{id}/usage
#[utoipa::path(
    get,
    path = "/api/keys/{id}/usage",
    tag = "Keys",
    params(
        ("id" = String, Path, description = "API key UUID")
    ),
    responses(
        (status = 200, description = "Key usage", body = KeyUsageResponse),
        (status = 401, description = "Missing or invalid session token"),
        (status = 404, description = "API key not found")
    ),
    security(
        ("bearer" = [])
    )
)]
#[get("/keys/{id}/usage")]
pub async fn get_key_usage(
    auth: SessionAuth,
    path: web::Path<String>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let (key, logs) =
        api_key::key_usage(pool.get_ref(), &path.into_inner(), &auth.user.user_id).await?;

    Ok(HttpResponse::Ok().json(KeyUsageResponse {
        success: true,
        key_id: key.id,
        name: key.name,
        usage_count: key.usage_count,
        last_used_at: key.last_used_at.map(|d| d.to_rfc3339()),
        logs: logs.into_iter().map(UsageLogItem::from).collect(),
    }))
}
