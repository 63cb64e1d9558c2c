//! PostgreSQL book store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, NewBook},
};

const BOOK_COLUMNS: &str =
    "id, title, author, isbn, publication_date, genre, available, description";

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, condition: &str, arg: &str) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books WHERE {} ORDER BY id",
            BOOK_COLUMNS, condition
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(arg)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// The unique index on isbn is the real guard against duplicates; map its
/// violation to the same error the service raises on its own check.
fn map_write_error(error: sqlx::Error, isbn: &str) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("Book with ISBN {} already exists", isbn))
        }
        _ => AppError::Database(error),
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    // strpos keeps user-supplied % and _ literal, unlike ILIKE
    async fn search_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        self.fetch_where("strpos(lower(author), lower($1)) > 0", author)
            .await
    }

    async fn search_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        self.fetch_where("strpos(lower(title), lower($1)) > 0", title)
            .await
    }

    async fn find_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        self.fetch_where("lower(genre) = lower($1)", genre).await
    }

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books WHERE available = $1 ORDER BY id",
            BOOK_COLUMNS
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(available)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (title, author, isbn, publication_date, genre, available, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.isbn)
            .bind(book.publication_date)
            .bind(&book.genre)
            .bind(book.available)
            .bind(&book.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &book.isbn))
    }

    async fn update(&self, id: i64, changes: &BookChanges) -> AppResult<Option<Book>> {
        let query = format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, publication_date = $5,
                genre = $6, available = COALESCE($7, available), description = $8
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.author)
            .bind(&changes.isbn)
            .bind(changes.publication_date)
            .bind(&changes.genre)
            .bind(changes.available)
            .bind(&changes.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &changes.isbn))
    }

    async fn set_available(&self, id: i64, available: bool) -> AppResult<Option<Book>> {
        let query = format!(
            "UPDATE books SET available = $2 WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(available)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
