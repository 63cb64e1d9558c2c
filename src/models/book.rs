//! Book record model, the candidate accepted on create/update, and the
//! query types used by the search endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{field_errors, FieldError};

/// Persisted book record, also the JSON shape returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Assigned by the store on creation
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: Option<String>,
    pub available: bool,
    pub description: Option<String>,
}

/// Caller-supplied book for create and full update.
///
/// Missing or null strings deserialize as empty so they are reported as
/// field errors rather than as a malformed body.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Ignored; ids are always assigned by the store
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters")
    )]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "not_blank", message = "Author is required"),
        length(min = 1, max = 100, message = "Author must be between 1 and 100 characters")
    )]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        custom(function = "not_blank", message = "ISBN is required"),
        length(min = 10, max = 13, message = "ISBN must be between 10 and 13 characters")
    )]
    pub isbn: String,
    #[serde(default)]
    #[validate(required(message = "Publication date is required"))]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Genre must not exceed 50 characters"))]
    pub genre: Option<String>,
    /// Defaults to `true` on create; left unchanged on update when absent
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl BookPayload {
    /// Every rule the payload breaks, empty when it is acceptable
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => field_errors(&errors),
        }
    }

    /// Replacement values for an existing record. `available` stays `None`
    /// when the caller did not supply it, so the stored flag is kept.
    /// Returns `None` when the publication date is missing.
    pub fn into_changes(self) -> Option<BookChanges> {
        Some(BookChanges {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            publication_date: self.publication_date?,
            genre: self.genre,
            available: self.available,
            description: self.description,
        })
    }

    /// Build the insert row, applying the default availability.
    /// Returns `None` when the publication date is missing.
    pub fn into_new_book(self) -> Option<NewBook> {
        Some(NewBook {
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            publication_date: self.publication_date?,
            genre: self.genre,
            available: self.available.unwrap_or(true),
            description: self.description,
        })
    }
}

/// Row to insert; `available` is already resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: Option<String>,
    pub available: bool,
    pub description: Option<String>,
}

impl NewBook {
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            publication_date: self.publication_date,
            genre: self.genre,
            available: self.available,
            description: self.description,
        }
    }
}

/// Full replacement of a record's mutable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: Option<String>,
    /// `None` leaves the stored value untouched
    pub available: Option<bool>,
    pub description: Option<String>,
}

impl BookChanges {
    pub fn apply_to(&self, book: &mut Book) {
        book.title = self.title.clone();
        book.author = self.author.clone();
        book.isbn = self.isbn.clone();
        book.publication_date = self.publication_date;
        book.genre = self.genre.clone();
        book.description = self.description.clone();
        if let Some(available) = self.available {
            book.available = available;
        }
    }
}

/// Body of `PATCH /api/books/{id}/availability`. A missing or null
/// `available` is rejected by the handler.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityUpdate {
    #[serde(default)]
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Case-insensitive substring of the author
    pub author: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleQuery {
    /// Case-insensitive substring of the title
    pub title: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenreQuery {
    /// Genre, matched exactly but case-insensitively
    pub genre: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookPayload {
        BookPayload {
            id: None,
            title: "Clean Code".to_string(),
            author: "Robert C. Martin".to_string(),
            isbn: "9780132350884".to_string(),
            publication_date: NaiveDate::from_ymd_opt(2008, 8, 1),
            genre: Some("Programming".to_string()),
            available: None,
            description: None,
        }
    }

    fn fields(p: &BookPayload) -> Vec<String> {
        p.field_errors().into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_payload() {
        assert!(payload().field_errors().is_empty());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut p = payload();
        p.title = "   ".to_string();
        let errors = p.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn test_length_bounds() {
        let mut p = payload();
        p.title = "t".repeat(201);
        p.author = "a".repeat(101);
        p.isbn = "123456789".to_string();
        p.genre = Some("g".repeat(51));
        p.description = Some("d".repeat(1001));
        assert_eq!(
            fields(&p),
            vec!["author", "description", "genre", "isbn", "title"]
        );

        let mut p = payload();
        p.title = "t".repeat(200);
        p.author = "a".repeat(100);
        p.isbn = "12345678901234".to_string();
        assert_eq!(fields(&p), vec!["isbn"]);
        p.isbn = "1234567890".to_string();
        p.genre = Some("g".repeat(50));
        p.description = Some("d".repeat(1000));
        assert!(p.field_errors().is_empty());
    }

    #[test]
    fn test_missing_fields_from_json() {
        let p: BookPayload = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(fields(&p), vec!["author", "author", "isbn", "isbn", "publicationDate"]);
    }

    #[test]
    fn test_wire_names() {
        let p: BookPayload = serde_json::from_value(serde_json::json!({
            "title": "Clean Code",
            "author": "Robert C. Martin",
            "isbn": "9780132350884",
            "publicationDate": "2008-08-01",
            "available": false
        }))
        .unwrap();
        assert_eq!(p.publication_date, NaiveDate::from_ymd_opt(2008, 8, 1));
        assert_eq!(p.available, Some(false));

        let book = p.into_new_book().unwrap().into_book(7);
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["publicationDate"], "2008-08-01");
        assert_eq!(json["id"], 7);
        assert_eq!(json["genre"], serde_json::Value::Null);
    }

    #[test]
    fn test_new_book_defaults_available() {
        let book = payload().into_new_book().unwrap();
        assert!(book.available);

        let mut p = payload();
        p.available = Some(false);
        assert!(!p.into_new_book().unwrap().available);

        let mut p = payload();
        p.publication_date = None;
        assert!(p.into_new_book().is_none());
    }

    #[test]
    fn test_changes_keep_availability_when_absent() {
        let mut book = payload().into_new_book().unwrap().into_book(1);
        book.available = false;

        let mut update = payload();
        update.title = "Clean Code, 2nd ed.".to_string();
        update.genre = None;
        let changes = update.into_changes().unwrap();
        assert_eq!(changes.available, None);
        changes.apply_to(&mut book);

        assert_eq!(book.id, 1);
        assert_eq!(book.title, "Clean Code, 2nd ed.");
        assert_eq!(book.genre, None);
        assert!(!book.available);

        let mut update = payload();
        update.available = Some(true);
        update.into_changes().unwrap().apply_to(&mut book);
        assert!(book.available);
    }

    #[test]
    fn test_null_strings_are_field_errors() {
        let p: BookPayload = serde_json::from_value(serde_json::json!({
            "title": null,
            "author": "Robert C. Martin",
            "isbn": null,
            "publicationDate": "2008-08-01"
        }))
        .unwrap();
        let errors = p.field_errors();
        assert!(errors
            .iter()
            .any(|e| e.field == "title" && e.message == "Title is required"));
        assert!(errors
            .iter()
            .any(|e| e.field == "isbn" && e.message == "ISBN is required"));
        assert!(errors.iter().all(|e| e.field != "author"));
    }
}
