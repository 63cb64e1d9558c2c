//! Book catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::{ApiJson, ApiPath, ApiQuery, ValidatedJson};
use crate::{
    error::{AppError, AppResult, FieldError},
    models::book::{AuthorQuery, AvailabilityUpdate, Book, BookPayload, GenreQuery, TitleQuery},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_all().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_by_id(id).await?;
    Ok(Json(book))
}

/// Get a book by ISBN
#[utoipa::path(
    get,
    path = "/api/books/isbn/{isbn}",
    tag = "books",
    params(("isbn" = String, Path, description = "Book ISBN")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<AppState>,
    ApiPath(isbn): ApiPath<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_by_isbn(&isbn).await?;
    Ok(Json(book))
}

/// Search books by author (case-insensitive substring)
#[utoipa::path(
    get,
    path = "/api/books/search/author",
    tag = "books",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Missing search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_by_author(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AuthorQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.find_by_author(&query.author).await?;
    Ok(Json(books))
}

/// Search books by title (case-insensitive substring)
#[utoipa::path(
    get,
    path = "/api/books/search/title",
    tag = "books",
    params(TitleQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Missing search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_by_title(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TitleQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.find_by_title(&query.title).await?;
    Ok(Json(books))
}

/// Search books by genre (case-insensitive exact match)
#[utoipa::path(
    get,
    path = "/api/books/search/genre",
    tag = "books",
    params(GenreQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Missing search term", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_by_genre(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<GenreQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.find_by_genre(&query.genre).await?;
    Ok(Json(books))
}

/// List books currently available
#[utoipa::path(
    get,
    path = "/api/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = Vec<Book>)
    )
)]
pub async fn list_available_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_available().await?;
    Ok(Json(books))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<BookPayload>,
) -> AppResult<Json<Book>> {
    let updated = state.services.catalog.update(id, payload).await?;
    Ok(Json(updated))
}

/// Change only the availability of a book
#[utoipa::path(
    patch,
    path = "/api/books/{id}/availability",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = AvailabilityUpdate,
    responses(
        (status = 200, description = "Availability updated", body = Book),
        (status = 400, description = "Missing availability", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_availability(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<AvailabilityUpdate>,
) -> AppResult<Json<Book>> {
    let available = body.available.ok_or_else(|| {
        AppError::Validation(vec![FieldError::new("available", "Available is required")])
    })?;
    let updated = state
        .services
        .catalog
        .set_availability(id, available)
        .await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(State(state): State<AppState>, ApiPath(id): ApiPath<i64>) -> AppResult<StatusCode> {
    state.services.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
