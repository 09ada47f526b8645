//! API endpoint modules.

pub mod auth;
pub mod countries;
pub mod health;
pub mod keys;
pub mod openapi;

pub use auth::configure_routes as configure_auth_routes;
pub use countries::configure_routes as configure_country_routes;
pub use health::configure_health_routes;
pub use keys::configure_routes as configure_key_routes;
pub use openapi::ApiDoc;

use actix_web::web;

use crate::error::AppError;

/// Register every `/api` route on the given scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_key_routes)
        .configure(configure_country_routes);
}

/// JSON body config that reports malformed bodies as `InvalidInput`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Query string config that reports bad parameters as `InvalidInput`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}
