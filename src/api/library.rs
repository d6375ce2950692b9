//! Personal library endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::ApiJson;
use crate::{
    error::AppResult,
    models::{BookIdRequest, MessageResponse, NormalizedBook},
    AppState,
};

/// List books in the library
#[utoipa::path(
    get,
    path = "/library",
    tag = "library",
    responses(
        (status = 200, description = "Books in the library", body = Vec<NormalizedBook>)
    )
)]
pub async fn list_library(State(state): State<AppState>) -> Json<Vec<NormalizedBook>> {
    Json(state.services.library.list_books().await)
}

/// Add a book to the library
#[utoipa::path(
    post,
    path = "/library",
    tag = "library",
    request_body = BookIdRequest,
    responses(
        (status = 201, description = "Book added", body = NormalizedBook),
        (status = 400, description = "Missing bookId or book already in library"),
        (status = 404, description = "Book not found in any catalog")
    )
)]
pub async fn add_to_library(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookIdRequest>,
) -> AppResult<(StatusCode, Json<NormalizedBook>)> {
    let book_id = request.into_book_id()?;
    let book = state.services.library.add(&book_id).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Remove a book from the library
#[utoipa::path(
    delete,
    path = "/library/{id}",
    tag = "library",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Book removed", body = MessageResponse),
        (status = 404, description = "Book not in library")
    )
)]
pub async fn remove_from_library(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.library.remove(&id).await?;
    Ok(Json(MessageResponse::new("Book removed from library")))
}
