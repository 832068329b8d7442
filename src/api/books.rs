//! Book and copy endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::{BookDetail, BookSummary, CreateBook, UpdateBook},
        copy::{CopySummary, UpdateCopyAvailability},
    },
    AppError, AppState,
};

use super::{IdPath, ValidatedJson};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<BookSummary>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookSummary>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookSummary),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Title or ISBN already used", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookSummary>)> {
    let created = state.services.catalog.create_book(&data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details, including copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book_details(id).await?;
    Ok(Json(book))
}

/// Update a book; omitted fields are left unchanged
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookSummary),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Title or ISBN already used", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
    ValidatedJson(data): ValidatedJson<UpdateBook>,
) -> AppResult<Json<BookSummary>> {
    let updated = state.services.catalog.update_book(id, &data).await?;
    Ok(Json(updated))
}

/// Delete a book and all of its copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "copies",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "List of copies", body = Vec<CopySummary>),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    IdPath(book_id): IdPath<i64>,
) -> AppResult<Json<Vec<CopySummary>>> {
    let copies = state.services.catalog.list_copies(book_id).await?;
    Ok(Json(copies))
}

/// Add an available copy to a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Copy created", body = CopySummary),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn add_copy(
    State(state): State<AppState>,
    IdPath(book_id): IdPath<i64>,
) -> AppResult<(StatusCode, Json<CopySummary>)> {
    let copy = state.services.catalog.add_copy(book_id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Mark a copy available or unavailable
#[utoipa::path(
    put,
    path = "/books/{id}/copies/{copy_id}",
    tag = "copies",
    params(
        ("id" = i64, Path, description = "Book ID"),
        ("copy_id" = i64, Path, description = "Copy ID")
    ),
    request_body = UpdateCopyAvailability,
    responses(
        (status = 200, description = "Copy updated", body = CopySummary),
        (status = 400, description = "Invalid input or copy belongs to another book", body = ErrorResponse),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn update_copy_availability(
    State(state): State<AppState>,
    IdPath((book_id, copy_id)): IdPath<(i64, i64)>,
    ValidatedJson(data): ValidatedJson<UpdateCopyAvailability>,
) -> AppResult<Json<CopySummary>> {
    let available = data
        .available
        .ok_or_else(|| AppError::Validation("available: Availability status is required".into()))?;

    let copy = state
        .services
        .catalog
        .set_copy_availability(book_id, copy_id, available)
        .await?;
    Ok(Json(copy))
}
