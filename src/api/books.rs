//! Book inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::book::{Book, CreateBook, UpdateBook},
    AppState,
};

use super::{JsonBody, StaffToken};

/// List all books ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Add a book to the inventory
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    _staff: StaffToken,
    JsonBody(data): JsonBody<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.catalog.add_book(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Book>> {
    state
        .services
        .catalog
        .get_book(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
}

/// Edit a book's details or copy counts
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    _staff: StaffToken,
    Path(id): Path<i64>,
    JsonBody(data): JsonBody<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}
