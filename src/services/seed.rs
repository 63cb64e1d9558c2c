//! Sample catalog inserted on first start

use chrono::NaiveDate;

use super::catalog::CatalogService;
use crate::{error::AppResult, models::book::BookPayload};

fn sample(
    title: &str,
    author: &str,
    isbn: &str,
    published: (i32, u32, u32),
    genre: &str,
    available: bool,
    description: &str,
) -> BookPayload {
    let (year, month, day) = published;
    BookPayload {
        id: None,
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        publication_date: NaiveDate::from_ymd_opt(year, month, day),
        genre: Some(genre.to_string()),
        available: Some(available),
        description: Some(description.to_string()),
    }
}

pub fn sample_books() -> Vec<BookPayload> {
    vec![
        sample(
            "Clean Code",
            "Robert C. Martin",
            "9780132350884",
            (2008, 8, 1),
            "Programming",
            true,
            "A Handbook of Agile Software Craftsmanship",
        ),
        sample(
            "Effective Java",
            "Joshua Bloch",
            "9780134685991",
            (2017, 12, 27),
            "Programming",
            true,
            "Best practices for the Java platform",
        ),
        sample(
            "Design Patterns",
            "Erich Gamma",
            "9780201633610",
            (1994, 10, 31),
            "Software Engineering",
            false,
            "Elements of Reusable Object-Oriented Software",
        ),
        sample(
            "Spring in Action",
            "Craig Walls",
            "9781617294945",
            (2018, 10, 1),
            "Programming",
            true,
            "Covers Spring 5",
        ),
        sample(
            "The Pragmatic Programmer",
            "Andrew Hunt",
            "9780135957059",
            (2019, 9, 13),
            "Software Engineering",
            true,
            "Your Journey to Mastery",
        ),
    ]
}

/// Insert the sample books if the catalog is empty. Returns how many were added.
pub async fn seed_if_empty(catalog: &CatalogService) -> AppResult<usize> {
    if catalog.count().await? > 0 {
        tracing::debug!("Catalog not empty, skipping sample data");
        return Ok(0);
    }

    let books = sample_books();
    let added = books.len();
    for book in books {
        catalog.create(book).await?;
    }
    tracing::info!("Sample data initialized: {} books added", added);
    Ok(added)
}
