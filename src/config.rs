//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};

/// HTTP header name for API key authentication.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Query parameter accepted as a fallback for the API key header.
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Minimum JWT secret length accepted in production.
const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest session lifetime accepted (one year).
const MAX_JWT_TTL_SECS: u64 = 365 * 86_400;

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "sqlite://data/countries-gateway.db?mode=rwc";
    pub const DEV_JWT_SECRET: &str = "dev-jwt-secret-do-not-use-in-production";
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 5000;
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;
    pub const DEV_JWT_TTL_SECS: u64 = 86_400; // 24 hours
    pub const DEV_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173";

    pub const UPSTREAM_URL: &str = "https://restcountries.com/v3.1";
    pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;
    pub const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// SeaORM connection URL (`postgres://...` or `sqlite://...`)
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseSettings {
    /// Parent directory of a file-backed SQLite database, if any.
    pub fn sqlite_parent_dir(&self) -> Option<PathBuf> {
        let rest = self.url.strip_prefix("sqlite:")?;
        let path = rest.trim_start_matches("//");
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() || path.starts_with(":memory:") {
            return None;
        }
        PathBuf::from(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
    }
}

/// Dashboard session token settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// HS256 signing secret
    pub jwt_secret: SecretString,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

/// Upstream country-information API settings.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL without trailing slash (e.g. `https://restcountries.com/v3.1`)
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database settings
    pub database: DatabaseSettings,
    /// Session token settings
    pub session: SessionSettings,
    /// Upstream API settings
    pub upstream: UpstreamSettings,
    /// Directory with a pre-built dashboard (optional)
    pub static_dir: Option<PathBuf>,
    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default
    /// and only RUST_ENV is required. In production mode the server will NOT
    /// start with the development database URL or JWT secret.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `CGW_HOST`: Server host (default: 127.0.0.1)
    /// - `CGW_PORT`: Server port (default: 5000)
    /// - `CGW_DATABASE_URL`: Database URL (default: local SQLite file)
    /// - `CGW_DB_MAX_CONNECTIONS` / `CGW_DB_MIN_CONNECTIONS`: pool size (default: 10 / 1)
    /// - `CGW_JWT_SECRET`: Session signing secret
    /// - `CGW_JWT_TTL_SECS`: Session lifetime (default: 86400)
    /// - `CGW_UPSTREAM_URL`: Country API base URL
    /// - `CGW_UPSTREAM_TIMEOUT_SECS` / `CGW_UPSTREAM_CONNECT_TIMEOUT_SECS`: HTTP timeouts
    /// - `CGW_STATIC_DIR`: Pre-built dashboard directory
    /// - `CGW_CORS_ORIGINS`: Comma-separated allowed origins
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = env::var("CGW_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = parse_var("CGW_PORT", defaults::DEV_PORT)
            .map_err(|_| ConfigError::InvalidValue("CGW_PORT must be a valid port number"))?;

        let database = DatabaseSettings {
            url: env::var("CGW_DATABASE_URL")
                .unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: parse_var("CGW_DB_MAX_CONNECTIONS", defaults::DEV_DB_MAX_CONNECTIONS)
                .map_err(|_| {
                    ConfigError::InvalidValue("CGW_DB_MAX_CONNECTIONS must be a valid number")
                })?,
            min_connections: parse_var("CGW_DB_MIN_CONNECTIONS", defaults::DEV_DB_MIN_CONNECTIONS)
                .map_err(|_| {
                    ConfigError::InvalidValue("CGW_DB_MIN_CONNECTIONS must be a valid number")
                })?,
        };

        let session = SessionSettings {
            jwt_secret: SecretString::from(
                env::var("CGW_JWT_SECRET").unwrap_or_else(|_| defaults::DEV_JWT_SECRET.to_string()),
            ),
            token_ttl_secs: parse_var("CGW_JWT_TTL_SECS", defaults::DEV_JWT_TTL_SECS)
                .map_err(|_| ConfigError::InvalidValue("CGW_JWT_TTL_SECS must be a valid number"))
                .and_then(check_token_ttl)?,
        };

        let upstream = UpstreamSettings {
            base_url: env::var("CGW_UPSTREAM_URL")
                .unwrap_or_else(|_| defaults::UPSTREAM_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: parse_var("CGW_UPSTREAM_TIMEOUT_SECS", defaults::UPSTREAM_TIMEOUT_SECS)
                .map_err(|_| {
                    ConfigError::InvalidValue("CGW_UPSTREAM_TIMEOUT_SECS must be a valid number")
                })?,
            connect_timeout_secs: parse_var(
                "CGW_UPSTREAM_CONNECT_TIMEOUT_SECS",
                defaults::UPSTREAM_CONNECT_TIMEOUT_SECS,
            )
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "CGW_UPSTREAM_CONNECT_TIMEOUT_SECS must be a valid number",
                )
            })?,
        };

        let static_dir = env::var("CGW_STATIC_DIR").ok().map(PathBuf::from);

        let cors_origins = parse_origins(
            &env::var("CGW_CORS_ORIGINS").unwrap_or_else(|_| {
                if environment.is_development() {
                    defaults::DEV_CORS_ORIGINS.to_string()
                } else {
                    String::new()
                }
            }),
        );

        let config = Config {
            environment,
            host,
            port,
            database,
            session,
            upstream,
            static_dir,
            cors_origins,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "CGW_DATABASE_URL is using development default '{}'. Set a production database URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        let secret = self.session.jwt_secret.expose_secret();
        if secret == defaults::DEV_JWT_SECRET {
            errors.push(
                "CGW_JWT_SECRET is using development default. Set a secure signing secret."
                    .to_string(),
            );
        } else if secret.len() < MIN_JWT_SECRET_LEN {
            errors.push(format!(
                "CGW_JWT_SECRET must be at least {} bytes long.",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            errors.push(
                "CGW_DB_MIN_CONNECTIONS must not exceed CGW_DB_MAX_CONNECTIONS.".to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Read a variable and parse it, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, T::Err> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>(),
        Err(_) => Ok(default),
    }
}

/// Session lifetime must be positive and at most one year.
fn check_token_ttl(ttl: u64) -> Result<u64, ConfigError> {
    if (1..=MAX_JWT_TTL_SECS).contains(&ttl) {
        Ok(ttl)
    } else {
        Err(ConfigError::InvalidValue(
            "CGW_JWT_TTL_SECS must be between 1 and 31536000 (one year)",
        ))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
