//! Repository layer: the book store contract and its implementations

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::book::{Book, BookChanges, NewBook},
};

pub use books::PgBookStore;
pub use memory::MemoryBookStore;

/// Durable storage and lookup of book records. No business rules live here,
/// except that implementations must reject a second record with the same
/// isbn with `AppError::Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All records in insertion order
    async fn list_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    /// Case-insensitive substring match on author
    async fn search_by_author(&self, author: &str) -> AppResult<Vec<Book>>;

    /// Case-insensitive substring match on title
    async fn search_by_title(&self, title: &str) -> AppResult<Vec<Book>>;

    /// Case-insensitive exact match on genre
    async fn find_by_genre(&self, genre: &str) -> AppResult<Vec<Book>>;

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Book>>;

    /// Persist a new record and return it with its assigned id
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Replace the mutable fields of one record in a single write. The
    /// availability flag is only written when `changes.available` is set.
    /// `None` when no record had that id.
    async fn update(&self, id: i64, changes: &BookChanges) -> AppResult<Option<Book>>;

    /// Write only the availability flag; `None` when no record had that id
    async fn set_available(&self, id: i64, available: bool) -> AppResult<Option<Book>>;

    /// Remove a record; `false` when no record had that id
    async fn delete(&self, id: i64) -> AppResult<bool>;

    async fn count(&self) -> AppResult<i64>;
}
