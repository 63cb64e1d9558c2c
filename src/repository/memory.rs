//! In-memory book store

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, NewBook},
};

#[derive(Default)]
struct Inner {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

/// Volatile store keyed by id. Ids come from a counter that never goes
/// back, so a deleted id is never handed out again.
#[derive(Default)]
pub struct MemoryBookStore {
    inner: RwLock<Inner>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter<F>(&self, predicate: F) -> Vec<Book>
    where
        F: Fn(&Book) -> bool,
    {
        let inner = self.inner.read().await;
        inner.books.values().filter(|b| predicate(*b)).cloned().collect()
    }
}

fn isbn_taken(inner: &Inner, isbn: &str, except: Option<i64>) -> bool {
    inner
        .books
        .values()
        .any(|b| b.isbn == isbn && Some(b.id) != except)
}

fn duplicate(isbn: &str) -> AppError {
    AppError::Conflict(format!("Book with ISBN {} already exists", isbn))
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.filter(|_| true).await)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let inner = self.inner.read().await;
        Ok(inner.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.read().await.books.contains_key(&id))
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        Ok(isbn_taken(&*self.inner.read().await, isbn, None))
    }

    async fn search_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        let needle = author.to_lowercase();
        Ok(self
            .filter(|b| b.author.to_lowercase().contains(&needle))
            .await)
    }

    async fn search_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        let needle = title.to_lowercase();
        Ok(self
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        let wanted = genre.to_lowercase();
        Ok(self
            .filter(|b| {
                b.genre
                    .as_deref()
                    .is_some_and(|g| g.to_lowercase() == wanted)
            })
            .await)
    }

    async fn find_by_availability(&self, available: bool) -> AppResult<Vec<Book>> {
        Ok(self.filter(|b| b.available == available).await)
    }

    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut inner = self.inner.write().await;
        if isbn_taken(&inner, &book.isbn, None) {
            return Err(duplicate(&book.isbn));
        }
        inner.last_id += 1;
        let stored = book.clone().into_book(inner.last_id);
        inner.books.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: &BookChanges) -> AppResult<Option<Book>> {
        let mut inner = self.inner.write().await;
        if !inner.books.contains_key(&id) {
            return Ok(None);
        }
        if isbn_taken(&inner, &changes.isbn, Some(id)) {
            return Err(duplicate(&changes.isbn));
        }
        Ok(inner.books.get_mut(&id).map(|book| {
            changes.apply_to(book);
            book.clone()
        }))
    }

    async fn set_available(&self, id: i64, available: bool) -> AppResult<Option<Book>> {
        let mut inner = self.inner.write().await;
        Ok(inner.books.get_mut(&id).map(|book| {
            book.available = available;
            book.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.inner.write().await.books.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.books.len() as i64)
    }
}
