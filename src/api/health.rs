//! Liveness and readiness probes.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::ErrorResponse;
use crate::migration::Migrator;

/// Liveness payload.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    success: bool,
    service: &'static str,
    version: &'static str,
    timestamp: String,
}

/// Readiness payload: the credential store is reachable and fully migrated.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    success: bool,
    database: &'static str,
    applied_migrations: usize,
}

fn not_ready(message: String) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ErrorResponse {
        success: false,
        error: "NOT_READY".to_string(),
        message,
    })
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway process is up", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        success: true,
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Ready once the database answers and no migration is pending.
///
/// GET /api/ready
#[utoipa::path(
    get,
    path = "/api/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Gateway can serve keys and lookups", body = ReadyResponse),
        (status = 503, description = "Database unreachable or schema out of date", body = ErrorResponse)
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    let conn = pool.connection();

    if let Err(e) = conn.ping().await {
        tracing::warn!("Readiness: database ping failed: {}", e);
        return not_ready("Database connection failed".to_string());
    }

    let pending = match Migrator::get_pending_migrations(conn).await {
        Ok(pending) => pending.len(),
        Err(e) => {
            tracing::warn!("Readiness: migration status unavailable: {}", e);
            return not_ready("Migration status unavailable".to_string());
        }
    };
    if pending > 0 {
        return not_ready(format!("{} database migration(s) pending", pending));
    }

    HttpResponse::Ok().json(ReadyResponse {
        success: true,
        database: "connected",
        applied_migrations: Migrator::migrations().len(),
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
