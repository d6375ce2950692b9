//! Book search and detail endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    catalogs::google_books::MAX_RESULTS_LIMIT,
    error::AppResult,
    models::{BookLookup, BookSource, NormalizedBook},
    AppState,
};

/// Results per page on `/search`
pub const PAGE_SIZE: u32 = 10;
/// `maxResults` used when the parameter is missing or unusable
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Paginated search query parameters
#[derive(Deserialize, IntoParams, ToSchema, Debug)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text search terms
    pub q: Option<String>,
    /// Zero-based page number; invalid or negative values mean 0
    pub page: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub books: Vec<NormalizedBook>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total_items: u64,
    pub source: BookSource,
}

/// Raw pagination query parameters
#[derive(Deserialize, IntoParams, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Free-text search terms
    pub q: Option<String>,
    /// Offset of the first result
    pub start_index: Option<String>,
    /// Page size, capped at 40
    pub max_results: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSearchResponse {
    pub books: Vec<NormalizedBook>,
    pub total_items: u64,
    pub source: BookSource,
    pub query: String,
    pub start_index: u32,
    pub max_results: u32,
    /// Whether this page was served from the result cache
    pub from_cache: bool,
}

/// Parse a non-negative integer; anything else yields `None`, negatives clamp to 0
fn parse_count(value: Option<&str>) -> Option<u32> {
    let parsed: i64 = value?.trim().parse().ok()?;
    Some(parsed.clamp(0, i64::from(u32::MAX)) as u32)
}

/// Search books, ten per page
#[utoipa::path(
    get,
    path = "/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of results", body = SearchResponse),
        (status = 400, description = "Missing query"),
        (status = 503, description = "Both catalogs unavailable")
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let q = query.q.as_deref().unwrap_or_default();
    let page = parse_count(query.page.as_deref()).unwrap_or(0);
    let offset = page.saturating_mul(PAGE_SIZE);

    let fetched = state.services.books.search(q, offset, PAGE_SIZE).await?;
    let result = fetched.value;

    Ok(Json(SearchResponse {
        total_pages: result.total_pages(PAGE_SIZE),
        current_page: page,
        total_items: result.total_items,
        source: result.source,
        books: result.books,
    }))
}

/// Search books with raw offset/limit parameters
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Search results", body = BookSearchResponse),
        (status = 400, description = "Missing query"),
        (status = 503, description = "Both catalogs unavailable")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<BookSearchResponse>> {
    let q = query.q.as_deref().unwrap_or_default();
    let start_index = parse_count(query.start_index.as_deref()).unwrap_or(0);
    let max_results = parse_count(query.max_results.as_deref())
        .filter(|&n| n >= 1)
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .min(MAX_RESULTS_LIMIT);

    let fetched = state
        .services
        .books
        .search(q, start_index, max_results)
        .await?;
    let result = fetched.value;

    Ok(Json(BookSearchResponse {
        books: result.books,
        total_items: result.total_items,
        source: result.source,
        query: q.trim().to_string(),
        start_index,
        max_results,
        from_cache: fetched.from_cache,
    }))
}

/// Get book details by identifier
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Catalog book identifier")
    ),
    responses(
        (status = 200, description = "Book details", body = BookLookup),
        (status = 404, description = "Book not found in any catalog")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookLookup>> {
    let fetched = state.services.books.get_book(&id).await?;
    Ok(Json(fetched.value))
}
