//! API handlers for Shelfwise REST endpoints

pub mod books;
pub mod health;
pub mod library;
pub mod loans;
pub mod openapi;

use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections use the standard error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog search
        .route("/search", get(books::search))
        .route("/books/search", get(books::search_books))
        .route("/books/:id", get(books::get_book))
        // Library
        .route("/library", get(library::list_library).post(library::add_to_library))
        .route("/library/:id", delete(library::remove_from_library))
        // Loans
        .route("/borrowed", get(loans::list_borrowed))
        .route("/borrow", post(loans::borrow_book))
        .route("/return/:id", post(loans::return_book))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    with_middleware(Router::new().nest("/api", api).merge(openapi))
}

/// Panic recovery, request tracing and CORS around `router`
pub fn with_middleware(router: Router) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Turn a handler panic into the standard 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    AppError::Internal(format!("Handler panicked: {}", detail)).into_response()
}
