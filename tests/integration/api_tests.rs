//! API integration tests
//!
//! Drive the full router in-process with stub catalogs standing in for
//! Google Books and Open Library.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tower::ServiceExt;

use shelfwise_server::{
    api,
    catalogs::{CatalogClient, CatalogError},
    models::{BookSource, NormalizedBook, SearchPage},
    services::Services,
    AppConfig, AppState,
};

/// Catalog that answers every query with 35 hits, or fails when down
struct StubCatalog {
    source: BookSource,
    configured: bool,
    down: bool,
    calls: Arc<AtomicUsize>,
}

impl StubCatalog {
    fn new(source: BookSource) -> Self {
        Self {
            source,
            configured: true,
            down: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn down(mut self) -> Self {
        self.down = true;
        self
    }

    fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn search(&self, query: &str, offset: u32, limit: u32) -> Result<SearchPage, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(CatalogError::Timeout);
        }
        let books = (offset..offset + limit.min(3))
            .map(|i| {
                let mut book = NormalizedBook::new(format!("{}-{}", query, i), self.source);
                book.title = format!("{} #{}", query, i);
                book
            })
            .collect();
        Ok(SearchPage {
            books,
            total_items: 35,
            source: self.source,
        })
    }

    async fn get_book(&self, id: &str) -> Result<NormalizedBook, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down || id.starts_with("missing") {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        let mut book = NormalizedBook::new(id, self.source);
        book.title = format!("Book {}", id);
        Ok(book)
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

fn app(primary: StubCatalog, secondary: StubCatalog) -> Router {
    let config = AppConfig::default();
    let services = Services::with_clients(&config, Arc::new(primary), Arc::new(secondary));
    api::create_router(AppState::new(config, services))
}

fn default_app() -> Router {
    app(
        StubCatalog::new(BookSource::Google),
        StubCatalog::new(BookSource::OpenLibrary),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["googleBooksAvailable"], true);
    assert_eq!(body["libraryCount"], 0);
    assert_eq!(body["borrowedCount"], 0);
    assert!(body["cacheStats"]["keys"].is_number());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_search_from_primary() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/search?q=dune&page=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "google");
    assert_eq!(body["totalItems"], 35);
    assert_eq!(body["totalPages"], 4);
    assert_eq!(body["currentPage"], 0);
    assert!(body["books"].as_array().unwrap().len() <= 10);
    assert!(body.get("fromCache").is_none());
}

#[tokio::test]
async fn test_search_bad_page_clamps_to_zero() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/search?q=dune&page=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 0);

    let (status, body) = send(&app, "GET", "/api/search?q=dune&page=-2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 0);
    assert_eq!(body["books"][0]["id"], "dune-0");
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");

    let (status, _) = send(&app, "GET", "/api/books/search?q=%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_falls_back_to_secondary() {
    let app = app(
        StubCatalog::new(BookSource::Google).unconfigured(),
        StubCatalog::new(BookSource::OpenLibrary),
    );

    let (status, body) = send(&app, "GET", "/api/search?q=dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "openlibrary");

    let (_, health) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(health["googleBooksAvailable"], false);
}

#[tokio::test]
async fn test_both_catalogs_down() {
    let app = app(
        StubCatalog::new(BookSource::Google).down(),
        StubCatalog::new(BookSource::OpenLibrary).down(),
    );

    let (status, body) = send(&app, "GET", "/api/search?q=dune", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "UpstreamUnavailable");

    let (status, _) = send(&app, "GET", "/api/books/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_books_search_reports_cache() {
    let primary = StubCatalog::new(BookSource::Google);
    let calls = primary.calls.clone();
    let app = app(primary, StubCatalog::new(BookSource::OpenLibrary));

    let uri = "/api/books/search?q=dune&startIndex=5&maxResults=3";
    let (status, first) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["fromCache"], false);
    assert_eq!(first["query"], "dune");
    assert_eq!(first["startIndex"], 5);
    assert_eq!(first["maxResults"], 3);

    let (_, second) = send(&app, "GET", uri, None).await;
    assert_eq!(second["fromCache"], true);
    assert_eq!(first["books"], second["books"]);
    assert_eq!(first["totalItems"], second["totalItems"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_books_search_caps_max_results() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/books/search?q=dune&maxResults=500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maxResults"], 40);

    let (_, body) = send(&app, "GET", "/api/books/search?q=dune&maxResults=0", None).await;
    assert_eq!(body["maxResults"], 10);
}

#[tokio::test]
async fn test_book_details() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/books/zyTCAlFPjgYC", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "google");
    assert_eq!(body["book"]["id"], "zyTCAlFPjgYC");

    let (status, _) = send(&app, "GET", "/api/books/missing-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_library_lifecycle() {
    let app = default_app();

    let (status, book) = send(&app, "POST", "/api/library", Some(json!({"bookId": "X"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["id"], "X");
    assert_eq!(book["title"], "Book X");

    let (status, body) = send(&app, "POST", "/api/library", Some(json!({"bookId": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Conflict");

    let (_, list) = send(&app, "GET", "/api/library", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", "/api/library/X", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, "DELETE", "/api/library/X", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_library_add_validation() {
    let app = default_app();

    let (status, body) = send(&app, "POST", "/api/library", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");

    let (status, _) = send(&app, "POST", "/api/library", Some(json!({"bookId": "missing-9"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_and_return() {
    let app = default_app();
    send(&app, "POST", "/api/library", Some(json!({"bookId": "X"}))).await;

    let (status, record) = send(&app, "POST", "/api/borrow", Some(json!({"bookId": "X"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["bookId"], "X");
    let borrow_date = chrono::DateTime::parse_from_rfc3339(record["borrowDate"].as_str().unwrap()).unwrap();
    let due_date = chrono::DateTime::parse_from_rfc3339(record["dueDate"].as_str().unwrap()).unwrap();
    assert_eq!(due_date - borrow_date, chrono::Duration::days(14));

    let (status, body) = send(&app, "POST", "/api/borrow", Some(json!({"bookId": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Conflict");

    let (_, borrowed) = send(&app, "GET", "/api/borrowed", None).await;
    assert_eq!(borrowed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "POST", "/api/return/X", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "POST", "/api/return/X", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_borrow_requires_library_membership() {
    let app = default_app();

    let (status, _) = send(&app, "POST", "/api/borrow", Some(json!({"bookId": "Y"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/api/borrow", Some(json!({"bookId": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_cascades_to_borrow() {
    let app = default_app();
    send(&app, "POST", "/api/library", Some(json!({"bookId": "X"}))).await;
    send(&app, "POST", "/api/borrow", Some(json!({"bookId": "X"}))).await;

    let (status, _) = send(&app, "DELETE", "/api/library/X", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, borrowed) = send(&app, "GET", "/api/borrowed", None).await;
    assert!(borrowed.as_array().unwrap().is_empty());

    let (_, health) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(health["libraryCount"], 0);
    assert_eq!(health["borrowedCount"], 0);
}

#[tokio::test]
async fn test_mistyped_book_id_is_invalid_input() {
    let primary = StubCatalog::new(BookSource::Google);
    let calls = primary.calls.clone();
    let app = app(primary, StubCatalog::new(BookSource::OpenLibrary));

    for uri in ["/api/library", "/api/borrow"] {
        for body in [json!({"bookId": null}), json!({"bookId": 42}), json!(["bookId"])] {
            let (status, response) = send(&app, "POST", uri, Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, body);
            assert_eq!(response["error"], "InvalidInput");
            assert!(response["message"].is_string());
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_json_body_is_invalid_input() {
    let app = default_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/library")
        .header("content-type", "application/json")
        .body(Body::from("{\"bookId\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "InvalidInput");
}

#[tokio::test]
async fn test_handler_panic_returns_standard_500() {
    let app = api::with_middleware(
        Router::new().route("/boom", axum::routing::get(|| async { let unit: () = panic!("secret detail"); unit })),
    );

    let (status, body) = send(&app, "GET", "/boom", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Internal", "message": "Internal server error"})
    );
}

#[tokio::test]
async fn test_books_search_echoes_trimmed_query() {
    let app = default_app();

    let (status, body) = send(&app, "GET", "/api/books/search?q=%20dune%20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "dune");
    assert_eq!(body["books"][0]["id"], "dune-0");
}
