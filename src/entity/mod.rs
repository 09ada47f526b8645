//! SeaORM entity definitions.

pub mod api_key;
pub mod usage_log;
pub mod user;
