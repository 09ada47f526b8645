//! Country-data proxy: forwards lookups to the upstream API and reduces the records.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::UpstreamSettings;
use crate::error::{AppError, AppResult};
use crate::models::Country;
use crate::models::country::UpstreamPayload;

/// Fields requested from the upstream API.
const UPSTREAM_FIELDS: &str = "name,currencies,capital,languages,flags";

/// Lookup dimension with its query value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryLookup {
    All,
    Name(String),
    Region(String),
    Code(String),
    Currency(String),
    Language(String),
}

impl CountryLookup {
    /// Upstream path for this lookup, with the value percent-encoded.
    pub fn upstream_path(&self) -> String {
        let (segment, value) = match self {
            Self::All => return "/all".to_string(),
            Self::Name(v) => ("name", v),
            Self::Region(v) => ("region", v),
            Self::Code(v) => ("alpha", v),
            Self::Currency(v) => ("currency", v),
            Self::Language(v) => ("lang", v),
        };
        format!("/{}/{}", segment, urlencoding::encode(value.trim()))
    }

    /// Message returned when the upstream has no match.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Self::All | Self::Name(_) => "Country not found",
            Self::Region(_) => "Region not found",
            Self::Code(_) => "Country code not found",
            Self::Currency(_) => "Currency not found",
            Self::Language(_) => "Language not found",
        }
    }
}

/// HTTP client for the upstream country API.
#[derive(Clone)]
pub struct CountryClient {
    http: reqwest::Client,
    base_url: String,
}

impl CountryClient {
    /// Build a client with the configured timeouts.
    pub fn new(settings: &UpstreamSettings) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("countries-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a lookup and return the reduced records.
    ///
    /// An upstream 404 becomes `NotFound` with the dimension's message; any
    /// other failure becomes `Upstream`. Nothing is retried.
    pub async fn lookup(&self, lookup: &CountryLookup) -> AppResult<Vec<Country>> {
        let url = format!(
            "{}{}?fields={}",
            self.base_url,
            lookup.upstream_path(),
            UPSTREAM_FIELDS
        );
        debug!(url = %url, "Fetching countries from upstream");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                warn!("Upstream request failed: {}", e);
                AppError::Upstream(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(lookup.not_found_message().to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Upstream returned status {} for {}",
                status,
                lookup.upstream_path()
            )));
        }

        let payload: UpstreamPayload = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to decode upstream response: {}", e)))?;

        Ok(payload.into_vec().into_iter().map(Country::from).collect())
    }

    /// Look up a single country by alpha-2 or alpha-3 code.
    pub async fn lookup_code(&self, code: &str) -> AppResult<Country> {
        let lookup = CountryLookup::Code(code.to_string());
        self.lookup(&lookup)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(lookup.not_found_message().to_string()))
    }
}
