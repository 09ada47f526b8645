//! Business logic services.

pub mod accounts;
pub mod api_key;
pub mod countries;
pub mod password;
pub mod session;

pub use countries::{CountryClient, CountryLookup};
