//! Business logic services

pub mod books;
pub mod cache;
pub mod fetcher;
pub mod library;

use std::sync::Arc;
use std::time::Duration;

use crate::{
    catalogs::{CatalogClient, GoogleBooksClient, OpenLibraryClient},
    config::AppConfig,
    error::{AppError, AppResult},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub library: library::LibraryService,
}

impl Services {
    /// Create all services with the HTTP catalog clients described by `config`
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let primary = GoogleBooksClient::new(&config.catalog)
            .map_err(|e| AppError::Internal(format!("Failed to build Google Books client: {}", e)))?;
        let secondary = OpenLibraryClient::new(&config.catalog)
            .map_err(|e| AppError::Internal(format!("Failed to build Open Library client: {}", e)))?;

        Ok(Self::with_clients(config, Arc::new(primary), Arc::new(secondary)))
    }

    /// Create all services around the given catalog clients
    pub fn with_clients(
        config: &AppConfig,
        primary: Arc<dyn CatalogClient>,
        secondary: Arc<dyn CatalogClient>,
    ) -> Self {
        let fetcher = fetcher::CatalogFetcher::new(primary, secondary);
        Self {
            books: books::BooksService::new(
                fetcher.clone(),
                Duration::from_secs(config.cache.ttl_seconds),
            ),
            library: library::LibraryService::new(fetcher),
        }
    }
}
