//! Authentication extractors: API keys for the country proxy, bearer
//! session tokens for the dashboard.

mod extractor;

pub use extractor::{ApiKeyAuth, SessionAuth};
