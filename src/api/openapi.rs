//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Countries Gateway",
        version = "0.1.0",
        description = "API key gateway for country information lookups, with user accounts and key usage tracking"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Account endpoints
        api::auth::register,
        api::auth::login,
        api::auth::me,
        // Key management endpoints
        api::keys::list_api_keys,
        api::keys::create_api_key,
        api::keys::list_usage_logs,
        api::keys::toggle_api_key,
        api::keys::delete_api_key,
        api::keys::get_key_usage,
        // Country endpoints
        api::countries::all_countries,
        api::countries::countries_by_name,
        api::countries::countries_by_region,
        api::countries::country_by_code,
        api::countries::countries_by_currency,
        api::countries::countries_by_language,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            models::PaginationParams,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Accounts
            models::RegisterRequest,
            models::LoginRequest,
            models::AuthResponse,
            models::CurrentUserResponse,
            models::UserResponse,
            // Keys
            models::CreateApiKeyRequest,
            models::ApiKeyCreateResponse,
            models::ApiKeyListItem,
            models::ApiKeyListResponse,
            models::ApiKeyResponse,
            models::DeleteApiKeyResponse,
            models::UsageLogItem,
            models::UsageLogListResponse,
            models::KeyUsageResponse,
            // Countries
            models::country::CountryName,
            models::country::Currency,
            models::country::Flags,
            models::Country,
            models::CountryListResponse,
            models::CountryResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Account registration and dashboard sessions"),
        (name = "Keys", description = "API key management and usage logs"),
        (name = "Countries", description = "Country lookups (API key required)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key and bearer security schemes.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
