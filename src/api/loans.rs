//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiJson;
use crate::{
    error::AppResult,
    models::{BookIdRequest, BorrowRecord, MessageResponse},
    AppState,
};

/// List active borrows
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    responses(
        (status = 200, description = "Active borrows", body = Vec<BorrowRecord>)
    )
)]
pub async fn list_borrowed(State(state): State<AppState>) -> Json<Vec<BorrowRecord>> {
    Json(state.services.library.list_borrowed().await)
}

/// Borrow a book from the library
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    request_body = BookIdRequest,
    responses(
        (status = 200, description = "Book borrowed", body = BorrowRecord),
        (status = 400, description = "Missing bookId or book already borrowed"),
        (status = 404, description = "Book not in library")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BookIdRequest>,
) -> AppResult<Json<BorrowRecord>> {
    let book_id = request.into_book_id()?;
    let record = state.services.library.borrow(&book_id).await?;
    Ok(Json(record))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return/{id}",
    tag = "loans",
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Book returned", body = MessageResponse),
        (status = 404, description = "Book is not borrowed")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.library.return_book(&id).await?;
    Ok(Json(MessageResponse::new("Book returned successfully")))
}
