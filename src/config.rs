//! Configuration management for Shelfwise server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Upstream catalog endpoints and credentials
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Google Books API key; the primary catalog is skipped when absent
    pub google_books_api_key: Option<String>,
    pub google_books_url: String,
    pub open_library_url: String,
    pub open_library_covers_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

/// Per-IP request budget over a sliding window
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub window_seconds: u64,
    pub max_requests: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix SHELFWISE_)
            .add_source(
                Environment::with_prefix("SHELFWISE")
                    .separator("__")
                    .try_parsing(true),
            )
            // Conventional names used by hosting platforms
            .set_override_option(
                "catalog.google_books_api_key",
                env::var("GOOGLE_BOOKS_API_KEY").ok(),
            )?
            .set_override_option(
                "server.port",
                env::var("PORT").ok(),
            )?
            .build()?;

        let mut config: AppConfig = config.try_deserialize()?;
        config.catalog.google_books_api_key = config
            .catalog
            .google_books_api_key
            .take()
            .filter(|key| !key.trim().is_empty());
        Ok(config)
    }
}

impl CatalogConfig {
    pub fn has_primary_credential(&self) -> bool {
        self.google_books_api_key.is_some()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            google_books_api_key: None,
            google_books_url: "https://www.googleapis.com/books/v1".to_string(),
            open_library_url: "https://openlibrary.org".to_string(),
            open_library_covers_url: "https://covers.openlibrary.org".to_string(),
            request_timeout_secs: 5,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 3600 }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_seconds: 15 * 60,
            max_requests: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
