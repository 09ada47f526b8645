//! Domain models for the countries gateway.

use utoipa::ToSchema;

pub mod api_key;
pub mod country;
pub mod usage_log;
pub mod user;

// Re-export commonly used types
pub use api_key::{
    ApiKey, ApiKeyCreateResponse, ApiKeyListItem, ApiKeyListResponse, ApiKeyResponse,
    CreateApiKeyRequest, DeleteApiKeyResponse, VerifiedKey,
};
pub use country::{Country, CountryListResponse, CountryResponse};
pub use usage_log::{KeyUsageResponse, UsageLogEntry, UsageLogItem, UsageLogListResponse};
pub use user::{
    AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, SessionClaims, SessionUser,
    User, UserResponse,
};

/// Pagination parameters.
#[derive(Debug, Clone, Default, serde::Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl PaginationParams {
    /// Requested page, 1-based.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(default_page()).max(1)
    }

    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.clamped_limit())
    }

    /// Clamp limit to maximum allowed value.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.unwrap_or(default_limit()).clamp(1, 100)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };

        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}
