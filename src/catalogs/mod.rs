//! Upstream book catalogs
//!
//! Each catalog module owns its raw wire schema, the pure functions that
//! normalize it into [`NormalizedBook`](crate::models::NormalizedBook), and an
//! HTTP client implementing [`CatalogClient`].

pub mod google_books;
pub mod open_library;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NormalizedBook, SearchPage};

pub use google_books::GoogleBooksClient;
pub use open_library::OpenLibraryClient;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog credential not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            CatalogError::Status(status.as_u16())
        } else {
            CatalogError::Network(e.to_string())
        }
    }
}

/// Append `segments` to `base`, each percent-encoded as a single path segment.
/// Empty and dot segments are refused.
pub(crate) fn endpoint_url<I>(base: &str, segments: I) -> Result<reqwest::Url, CatalogError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let segments: Vec<I::Item> = segments.into_iter().collect();
    if let Some(dot) = segments.iter().find(|s| matches!(s.as_ref(), "" | "." | "..")) {
        return Err(CatalogError::InvalidUrl(format!("path segment {:?}", dot.as_ref())));
    }

    let mut url = reqwest::Url::parse(base).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| CatalogError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// A remote book-metadata catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Free-text search returning one page of normalized records
    async fn search(&self, query: &str, offset: u32, limit: u32) -> Result<SearchPage, CatalogError>;

    /// Single-record lookup by the catalog's own identifier
    async fn get_book(&self, id: &str) -> Result<NormalizedBook, CatalogError>;

    /// Whether the client has what it needs to issue requests
    fn is_configured(&self) -> bool {
        true
    }
}
