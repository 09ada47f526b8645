//! Dashboard account endpoints: register, login, current user.

use actix_web::{HttpResponse, get, post, web};

use crate::auth::SessionAuth;
use crate::config::SessionSettings;
use crate::db::{DbPool, users};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest};
use crate::services::accounts;

/// Configure account routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}

/// Register a new dashboard user.
///
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    )
)]
#[post("/auth/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    pool: web::Data<DbPool>,
    settings: web::Data<SessionSettings>,
) -> AppResult<HttpResponse> {
    let (token, user) =
        accounts::register(pool.get_ref(), settings.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        success: true,
        token,
        user: user.into(),
    }))
}

/// Log in with username and password.
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
#[post("/auth/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    settings: web::Data<SessionSettings>,
) -> AppResult<HttpResponse> {
    let (token, user) =
        accounts::login(pool.get_ref(), settings.get_ref(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token,
        user: user.into(),
    }))
}

/// Get the user behind the session token.
///
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer" = [])
    )
)]
#[get("/auth/me")]
pub async fn me(auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = users::find_by_id(pool.connection(), &auth.user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        success: true,
        user: user.into(),
    }))
}
