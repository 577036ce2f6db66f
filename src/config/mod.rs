pub mod listings;
pub mod sync;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub auth: AuthConfig,
    pub listings: ListingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:./data/realestate.db?mode=rwc".to_string(),
            max_connections: 25,
            min_connections: 5,
            connection_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub external_url: Option<String>,
    /// Requests per second allowed per client on `/api`
    pub api_rate_limit: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            external_url: None,
            api_rate_limit: 100,
        }
    }
}

impl ServerConfig {
    /// Public base URL used for absolute links and by the CLI client
    pub fn base_url(&self) -> String {
        self.external_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Listings per page on `/properties`
    pub page_size: usize,
    /// Featured listings on the home page
    pub featured_count: usize,
    pub api_default_limit: usize,
    pub api_max_limit: usize,
    pub max_request_body_size: usize,
    pub max_pages: usize, // Maximum pages to prevent overflow
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            featured_count: 6,
            api_default_limit: 20,
            api_max_limit: 100,
            max_request_body_size: 1_048_576,
            max_pages: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
    /// Bootstrap admin account, created at startup when both are set
    pub admin_email: Option<String>,
    #[serde(skip_serializing)]
    pub admin_password: Option<String>,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24,
            admin_email: None,
            admin_password: None,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsConfig {
    pub fixture_path: PathBuf,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            fixture_path: PathBuf::from("config/listings.yaml"),
        }
    }
}

/// Read and parse an environment variable, falling back when unset
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid {key} value"))),
        Err(_) => Ok(default),
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Settings::default();

        Ok(Settings {
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", defaults.database.url)?,
                max_connections: env_or(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
                min_connections: env_or(
                    "DATABASE_MIN_CONNECTIONS",
                    defaults.database.min_connections,
                )?,
                connection_timeout_seconds: env_or(
                    "DATABASE_CONNECTION_TIMEOUT",
                    defaults.database.connection_timeout_seconds,
                )?,
                idle_timeout_seconds: env_or(
                    "DATABASE_IDLE_TIMEOUT",
                    defaults.database.idle_timeout_seconds,
                )?,
            },
            server: ServerConfig {
                host: env_or("HOST", defaults.server.host)?,
                port: env_or("PORT", defaults.server.port)?,
                external_url: env_opt("EXTERNAL_URL"),
                api_rate_limit: env_or("API_RATE_LIMIT", defaults.server.api_rate_limit)?,
            },
            pagination: PaginationConfig {
                page_size: env_or("PAGE_SIZE", defaults.pagination.page_size)?,
                featured_count: env_or("FEATURED_COUNT", defaults.pagination.featured_count)?,
                api_default_limit: env_or(
                    "API_DEFAULT_LIMIT",
                    defaults.pagination.api_default_limit,
                )?,
                api_max_limit: env_or("API_MAX_LIMIT", defaults.pagination.api_max_limit)?,
                max_request_body_size: env_or(
                    "MAX_REQUEST_BODY_SIZE",
                    defaults.pagination.max_request_body_size,
                )?,
                max_pages: env_or("MAX_PAGES", defaults.pagination.max_pages)?,
            },
            auth: AuthConfig {
                session_ttl_hours: env_or("SESSION_TTL_HOURS", defaults.auth.session_ttl_hours)?,
                admin_email: env_opt("ADMIN_EMAIL"),
                admin_password: env_opt("ADMIN_PASSWORD"),
                secure_cookies: env_or("SECURE_COOKIES", defaults.auth.secure_cookies)?,
            },
            listings: ListingsConfig {
                fixture_path: env_or("LISTINGS_FIXTURE_PATH", defaults.listings.fixture_path)?,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.pagination.page_size == 0 {
            return Err(Error::Config("Page size must be non-zero".to_string()));
        }

        if self.pagination.api_max_limit == 0 || self.pagination.api_default_limit == 0 {
            return Err(Error::Config("API limits must be non-zero".to_string()));
        }

        if self.auth.session_ttl_hours <= 0 {
            return Err(Error::Config(
                "Session TTL must be a positive number of hours".to_string(),
            ));
        }

        Ok(())
    }
}
