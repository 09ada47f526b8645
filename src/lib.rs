//! Countries gateway library.
//!
//! Provides the core functionality of the gateway: user accounts and
//! dashboard sessions, API key issuance and verification, usage logging
//! and the authenticated country lookup proxy.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
