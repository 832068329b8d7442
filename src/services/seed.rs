//! Startup sample data

use crate::{
    error::AppResult,
    models::book::NewBook,
    repository::Repository,
};

/// A sample book and the availability of each of its copies
struct SampleBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    published_year: i32,
    copies: &'static [bool],
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "Effective Java",
        author: "Joshua Bloch",
        isbn: "9780134685991",
        published_year: 2018,
        copies: &[true, false],
    },
    SampleBook {
        title: "Clean Code",
        author: "Robert C. Martin",
        isbn: "9780132350884",
        published_year: 2008,
        copies: &[true],
    },
];

#[derive(Clone)]
pub struct SeedService {
    repository: Repository,
}

impl SeedService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Load the sample catalog when no book exists yet.
    /// Returns the number of books inserted.
    pub async fn seed_if_empty(&self) -> AppResult<usize> {
        if self.repository.books.count().await? > 0 {
            tracing::debug!("Catalog not empty, skipping sample data");
            return Ok(0);
        }

        for sample in SAMPLE_BOOKS {
            let book = self
                .repository
                .books
                .create(&NewBook {
                    title: sample.title.to_string(),
                    author: sample.author.to_string(),
                    isbn: sample.isbn.to_string(),
                    published_year: sample.published_year,
                })
                .await?;

            for &available in sample.copies {
                self.repository.copies.create(book.id, available).await?;
            }
        }

        tracing::info!("Loaded {} sample books", SAMPLE_BOOKS.len());
        Ok(SAMPLE_BOOKS.len())
    }
}
