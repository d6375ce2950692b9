//! Book search and lookup, served through the result cache

use std::time::Duration;

use super::{
    cache::{CacheStats, ResultCache},
    fetcher::{self, CatalogFetcher},
};
use crate::{
    error::AppResult,
    models::{BookLookup, SearchPage},
};

/// Cached payloads; search and lookup share one cache
#[derive(Debug, Clone)]
pub enum CachedResult {
    Search(SearchPage),
    Book(BookLookup),
}

/// A value plus whether it was served from the cache
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub from_cache: bool,
}

/// Fingerprint of a search request
pub fn search_key(query: &str, offset: u32, limit: u32) -> String {
    format!("search:{}:{}:{}", query, offset, limit)
}

/// Fingerprint of a single-book lookup
pub fn book_key(id: &str) -> String {
    format!("book:{}", id)
}

#[derive(Clone)]
pub struct BooksService {
    fetcher: CatalogFetcher,
    cache: ResultCache<CachedResult>,
}

impl BooksService {
    pub fn new(fetcher: CatalogFetcher, cache_ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: ResultCache::new(cache_ttl),
        }
    }

    /// Search the catalogs, reusing a cached page for identical requests
    pub async fn search(&self, query: &str, offset: u32, limit: u32) -> AppResult<Fetched<SearchPage>> {
        let query = fetcher::search_terms(query)?;

        let key = search_key(query, offset, limit);
        if let Some(CachedResult::Search(page)) = self.cache.get(&key).await {
            return Ok(Fetched {
                value: page,
                from_cache: true,
            });
        }

        let page = self.fetcher.search(query, offset, limit).await?;
        tracing::info!(
            "Search '{}' answered by {} ({} total)",
            query,
            page.source,
            page.total_items
        );
        self.cache.set(key, CachedResult::Search(page.clone())).await;

        Ok(Fetched {
            value: page,
            from_cache: false,
        })
    }

    /// Look up one book, reusing a cached result when present
    pub async fn get_book(&self, id: &str) -> AppResult<Fetched<BookLookup>> {
        let id = fetcher::book_id(id)?;

        let key = book_key(id);
        if let Some(CachedResult::Book(lookup)) = self.cache.get(&key).await {
            return Ok(Fetched {
                value: lookup,
                from_cache: true,
            });
        }

        let lookup = self.fetcher.get_book(id).await?;
        self.cache.set(key, CachedResult::Book(lookup.clone())).await;

        Ok(Fetched {
            value: lookup,
            from_cache: false,
        })
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub fn primary_available(&self) -> bool {
        self.fetcher.primary_available()
    }
}
