//! HTTP API test suite.
//!
//! Drives the full `/api` surface against an in-memory SQLite database and an
//! in-process mock of the upstream country API. No external services needed.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_accounts;
mod test_health;
mod test_key_lifecycle;
mod test_key_verification;
