//! Country lookup endpoints, gated by API key.

use actix_web::{HttpResponse, get, web};

use crate::auth::ApiKeyAuth;
use crate::error::AppResult;
use crate::models::{CountryListResponse, CountryResponse};
use crate::services::{CountryClient, CountryLookup};

/// Configure country routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(all_countries)
        .service(countries_by_name)
        .service(countries_by_region)
        .service(country_by_code)
        .service(countries_by_currency)
        .service(countries_by_language);
}

async fn list_response(client: &CountryClient, lookup: CountryLookup) -> AppResult<HttpResponse> {
    let data = client.lookup(&lookup).await?;
    Ok(HttpResponse::Ok().json(CountryListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// All countries.
///
/// GET /api/countries
#[utoipa::path(
    get,
    path = "/api/countries",
    tag = "Countries",
    responses(
        (status = 200, description = "All countries", body = CountryListResponse),
        (status = 401, description = "Missing API key"),
        (status = 403, description = "API key inactive or expired"),
        (status = 404, description = "Invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries")]
pub async fn all_countries(
    _auth: ApiKeyAuth,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    list_response(&client, CountryLookup::All).await
}

/// Countries matching a (partial) name.
///
/// GET /api/countries/name/{name}
#[utoipa::path(
    get,
    path = "/api/countries/name/{name}",
    tag = "Countries",
    params(("name" = String, Path, description = "Common or official name")),
    responses(
        (status = 200, description = "Matching countries", body = CountryListResponse),
        (status = 404, description = "Country not found or invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries/name/{name}")]
pub async fn countries_by_name(
    _auth: ApiKeyAuth,
    path: web::Path<String>,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    list_response(&client, CountryLookup::Name(path.into_inner())).await
}

/// Countries in a region.
///
/// GET /api/countries/region/{region}
#[utoipa::path(
    get,
    path = "/api/countries/region/{region}",
    tag = "Countries",
    params(("region" = String, Path, description = "Region, e.g. europe")),
    responses(
        (status = 200, description = "Countries in region", body = CountryListResponse),
        (status = 404, description = "Region not found or invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries/region/{region}")]
pub async fn countries_by_region(
    _auth: ApiKeyAuth,
    path: web::Path<String>,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    list_response(&client, CountryLookup::Region(path.into_inner())).await
}

/// A single country by alpha-2 or alpha-3 code.
///
/// GET /api/countries/code/{code}
#[utoipa::path(
    get,
    path = "/api/countries/code/{code}",
    tag = "Countries",
    params(("code" = String, Path, description = "ISO 3166 alpha-2 or alpha-3 code")),
    responses(
        (status = 200, description = "Country", body = CountryResponse),
        (status = 404, description = "Country code not found or invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries/code/{code}")]
pub async fn country_by_code(
    _auth: ApiKeyAuth,
    path: web::Path<String>,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    let data = client.lookup_code(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CountryResponse {
        success: true,
        data,
    }))
}

/// Countries using a currency.
///
/// GET /api/countries/currency/{currency}
#[utoipa::path(
    get,
    path = "/api/countries/currency/{currency}",
    tag = "Countries",
    params(("currency" = String, Path, description = "Currency code or name")),
    responses(
        (status = 200, description = "Countries using currency", body = CountryListResponse),
        (status = 404, description = "Currency not found or invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries/currency/{currency}")]
pub async fn countries_by_currency(
    _auth: ApiKeyAuth,
    path: web::Path<String>,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    list_response(&client, CountryLookup::Currency(path.into_inner())).await
}

/// Countries speaking a language.
///
/// GET /api/countries/language/{language}
#[utoipa::path(
    get,
    path = "/api/countries/language/{language}",
    tag = "Countries",
    params(("language" = String, Path, description = "Language code or name")),
    responses(
        (status = 200, description = "Countries speaking language", body = CountryListResponse),
        (status = 404, description = "Language not found or invalid API key"),
        (status = 502, description = "Upstream API failure")
    ),
    security(
        ("api_key" = [])
    )
)]
#[get("/countries/language/{language}")]
pub async fn countries_by_language(
    _auth: ApiKeyAuth,
    path: web::Path<String>,
    client: web::Data<CountryClient>,
) -> AppResult<HttpResponse> {
    list_response(&client, CountryLookup::Language(path.into_inner())).await
}
