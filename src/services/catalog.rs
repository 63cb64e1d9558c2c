//! Catalog management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload},
    repository::BookStore,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book not found with id: {}", id))
}

fn duplicate_isbn(isbn: &str) -> AppError {
    AppError::Conflict(format!("Book with ISBN {} already exists", isbn))
}

fn missing_publication_date() -> AppError {
    AppError::Validation(vec![crate::error::FieldError::new(
        "publicationDate",
        "Publication date is required",
    )])
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// All books in store order
    pub async fn list_all(&self) -> AppResult<Vec<Book>> {
        self.store.list_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.store.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        self.store
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book not found with ISBN: {}", isbn)))
    }

    pub async fn find_by_author(&self, author: &str) -> AppResult<Vec<Book>> {
        self.store.search_by_author(author).await
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        self.store.search_by_title(title).await
    }

    pub async fn find_by_genre(&self, genre: &str) -> AppResult<Vec<Book>> {
        self.store.find_by_genre(genre).await
    }

    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        self.store.find_by_availability(true).await
    }

    /// Total number of books, used by the readiness check and seeding
    pub async fn count(&self) -> AppResult<i64> {
        self.store.count().await
    }

    /// Create a book. The isbn must not be in use; `available` defaults to
    /// true. A duplicate that slips past the check is still rejected by the
    /// store as a conflict.
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        if self.store.exists_by_isbn(&payload.isbn).await? {
            tracing::warn!("Catalog create: rejected duplicate ISBN {}", payload.isbn);
            return Err(duplicate_isbn(&payload.isbn));
        }

        let new_book = payload
            .into_new_book()
            .ok_or_else(missing_publication_date)?;
        let created = self.store.insert(&new_book).await?;
        tracing::info!("Catalog create: book id={} isbn={}", created.id, created.isbn);
        Ok(created)
    }

    /// Replace the mutable fields of an existing book. `available` keeps its
    /// current value unless the payload carries one; the store writes the
    /// record in one statement so a concurrent availability change is kept.
    pub async fn update(&self, id: i64, payload: BookPayload) -> AppResult<Book> {
        let current = self.get_by_id(id).await?;

        if current.isbn != payload.isbn && self.store.exists_by_isbn(&payload.isbn).await? {
            tracing::warn!("Catalog update: id={} rejected duplicate ISBN {}", id, payload.isbn);
            return Err(duplicate_isbn(&payload.isbn));
        }

        let changes = payload
            .into_changes()
            .ok_or_else(missing_publication_date)?;
        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Catalog update: book id={}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(not_found(id));
        }
        // Gone between the check and the delete: same outcome for the caller
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!("Catalog delete: book id={}", id);
        Ok(())
    }

    /// Set only the availability flag
    pub async fn set_availability(&self, id: i64, available: bool) -> AppResult<Book> {
        let updated = self
            .store
            .set_available(id, available)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!("Catalog availability: book id={} available={}", id, available);
        Ok(updated)
    }
}
