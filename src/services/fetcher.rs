//! Two-tier catalog fetcher
//!
//! Tries the primary catalog first, then the secondary. Catalog errors never
//! leave this module: exhausting both catalogs becomes `UpstreamUnavailable`
//! for searches and `NotFound` for single lookups.

use std::sync::Arc;

use crate::{
    catalogs::{CatalogClient, CatalogError},
    error::{AppError, AppResult},
    models::{BookLookup, BookSource, SearchPage},
};

/// Outcome of asking one catalog
enum Attempt<T> {
    Answered(T),
    Failed(CatalogError),
}

impl<T> From<Result<T, CatalogError>> for Attempt<T> {
    fn from(result: Result<T, CatalogError>) -> Self {
        match result {
            Ok(value) => Attempt::Answered(value),
            Err(e) => Attempt::Failed(e),
        }
    }
}

/// Trimmed search terms; blank input is rejected before any catalog is asked
pub(crate) fn search_terms(query: &str) -> AppResult<&str> {
    required(query, "Search query is required")
}

/// Trimmed catalog identifier; blank input is rejected before any catalog is asked
pub(crate) fn book_id(id: &str) -> AppResult<&str> {
    required(id, "Book id is required")
}

fn required<'a>(value: &'a str, message: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(value)
}

#[derive(Clone)]
pub struct CatalogFetcher {
    primary: Arc<dyn CatalogClient>,
    secondary: Arc<dyn CatalogClient>,
}

impl CatalogFetcher {
    pub fn new(primary: Arc<dyn CatalogClient>, secondary: Arc<dyn CatalogClient>) -> Self {
        Self { primary, secondary }
    }

    /// Whether the primary catalog has a credential to work with
    pub fn primary_available(&self) -> bool {
        self.primary.is_configured()
    }

    /// Search both tiers for `query`, returning the first page that answers
    pub async fn search(&self, query: &str, offset: u32, limit: u32) -> AppResult<SearchPage> {
        let query = search_terms(query)?;

        let primary = if self.primary.is_configured() {
            Attempt::from(self.primary.search(query, offset, limit).await)
        } else {
            Attempt::Failed(CatalogError::NotConfigured)
        };
        match primary {
            Attempt::Answered(page) => return Ok(page),
            Attempt::Failed(e) => {
                tracing::warn!("Primary catalog search failed, falling back: {}", e);
            }
        }

        match Attempt::from(self.secondary.search(query, offset, limit).await) {
            Attempt::Answered(page) => Ok(page),
            Attempt::Failed(e) => {
                tracing::error!("Secondary catalog search failed: {}", e);
                Err(AppError::UpstreamUnavailable(
                    "Book search is temporarily unavailable".to_string(),
                ))
            }
        }
    }

    /// Look up one book by identifier in both tiers
    pub async fn get_book(&self, id: &str) -> AppResult<BookLookup> {
        let id = book_id(id)?;

        let primary = if self.primary.is_configured() {
            Attempt::from(self.primary.get_book(id).await)
        } else {
            Attempt::Failed(CatalogError::NotConfigured)
        };
        match primary {
            Attempt::Answered(book) => {
                return Ok(BookLookup {
                    book,
                    source: BookSource::Google,
                })
            }
            Attempt::Failed(e) => {
                tracing::warn!("Primary catalog lookup of {} failed, falling back: {}", id, e);
            }
        }

        match Attempt::from(self.secondary.get_book(id).await) {
            Attempt::Answered(book) => Ok(BookLookup {
                book,
                source: BookSource::OpenLibrary,
            }),
            Attempt::Failed(e) => {
                tracing::info!("Book {} not found in any catalog: {}", id, e);
                Err(AppError::NotFound(format!("Book {} not found", id)))
            }
        }
    }
}
