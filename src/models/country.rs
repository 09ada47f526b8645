//! Country models: the upstream record and the reduced shape we serve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Country names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CountryName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// Currency details keyed by ISO 4217 code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Flag image URLs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: String,
}

/// Reduced country record returned to API key holders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    pub name: CountryName,
    pub currencies: BTreeMap<String, Currency>,
    pub capital: Vec<String>,
    pub languages: BTreeMap<String, String>,
    pub flags: Flags,
}

/// Country record as returned by the upstream API.
///
/// Only the fields we keep are declared; anything else is ignored and any
/// missing or null field falls back to its empty value.
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamCountry {
    #[serde(default)]
    pub name: Option<CountryName>,
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(default)]
    pub capital: Option<Vec<String>>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub flags: Option<Flags>,
}

impl From<UpstreamCountry> for Country {
    fn from(c: UpstreamCountry) -> Self {
        Self {
            name: c.name.unwrap_or_default(),
            currencies: c.currencies.unwrap_or_default(),
            capital: c.capital.unwrap_or_default(),
            languages: c.languages.unwrap_or_default(),
            flags: c.flags.unwrap_or_default(),
        }
    }
}

/// Upstream payload that is either a list or a single record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    Many(Vec<UpstreamCountry>),
    One(Box<UpstreamCountry>),
}

impl UpstreamPayload {
    pub fn into_vec(self) -> Vec<UpstreamCountry> {
        match self {
            Self::Many(list) => list,
            Self::One(country) => vec![*country],
        }
    }
}

/// Response for list lookups.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountryListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Country>,
}

/// Response for the alpha code lookup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CountryResponse {
    pub success: bool,
    pub data: Country,
}
