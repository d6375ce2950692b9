//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, library, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfwise API",
        version = "0.1.0",
        description = "Book search and personal library REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::search,
        books::search_books,
        books::get_book,
        // Library
        library::list_library,
        library::add_to_library,
        library::remove_from_library,
        // Loans
        loans::list_borrowed,
        loans::borrow_book,
        loans::return_book,
    ),
    components(
        schemas(
            // Books
            books::SearchQuery,
            books::SearchResponse,
            books::BookSearchQuery,
            books::BookSearchResponse,
            crate::models::book::NormalizedBook,
            crate::models::book::BookSource,
            crate::models::book::BookLookup,
            // Library and loans
            crate::models::library::BookIdRequest,
            crate::models::library::BorrowRecord,
            crate::models::library::MessageResponse,
            // Health
            health::HealthResponse,
            crate::services::cache::CacheStats,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog search and book details"),
        (name = "library", description = "Personal library management"),
        (name = "loans", description = "Borrowing and returns")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
