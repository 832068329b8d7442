//! Repository layer: storage contracts for books and copies, and their engines

pub mod books;
pub mod copies;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, NewBook},
        copy::Copy,
    },
};

/// Persistence contract for books.
///
/// Engines must enforce title and ISBN uniqueness atomically and report a conflict
/// as [`AppError::DuplicateBook`]. Deleting a book removes all of its copies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// All books, ordered by id
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool>;

    async fn exists_by_title(&self, title: &str) -> AppResult<bool>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    /// Insert a new book; the store assigns its id
    async fn create(&self, data: &NewBook) -> AppResult<Book>;

    /// Persist the fields of an existing book
    async fn update(&self, book: &Book) -> AppResult<Book>;

    /// Delete a book and, by cascade, its copies
    async fn delete(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;
}

/// Persistence contract for copies
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CopyStore: Send + Sync {
    /// Copies of a book in creation order
    async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<Copy>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Copy>>;

    async fn create(&self, book_id: i64, available: bool) -> AppResult<Copy>;

    async fn update(&self, copy: &Copy) -> AppResult<Copy>;
}

/// Main repository struct holding the catalog stores
#[derive(Clone)]
pub struct Repository {
    pub pool: Option<Pool<Postgres>>,
    pub books: Arc<dyn BookStore>,
    pub copies: Arc<dyn CopyStore>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            copies: Arc::new(copies::CopiesRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository over a fresh in-memory catalog
    pub fn in_memory() -> Self {
        let catalog = Arc::new(memory::MemoryCatalog::new());
        Self {
            pool: None,
            books: catalog.clone(),
            copies: catalog,
        }
    }

    /// Create a repository from arbitrary store implementations
    pub fn from_stores(books: Arc<dyn BookStore>, copies: Arc<dyn CopyStore>) -> Self {
        Self {
            pool: None,
            books,
            copies,
        }
    }

    /// Check that the storage engine answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// Translate constraint violations raised by Postgres into catalog errors
pub(crate) fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::duplicate_book(),
        _ => AppError::Database(e),
    }
}

/// A copy insert whose book vanished between the existence check and the insert
pub(crate) fn map_copy_insert_error(e: sqlx::Error, book_id: i64) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::BookNotFound(book_id)
        }
        _ => AppError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    /// Stand-in for a Postgres constraint error
    #[derive(Debug)]
    struct ConstraintError {
        code: &'static str,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated ({})", self.code)
        }
    }

    impl StdError for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError { code }))
    }

    #[test]
    fn test_unique_violation_is_duplicate_book() {
        let err = map_write_error(db_error("23505"));
        assert!(matches!(err, AppError::DuplicateBook(_)));
        assert_eq!(err.to_string(), "Book with same title or ISBN already exists.");
    }

    #[test]
    fn test_other_write_errors_stay_database() {
        assert!(matches!(map_write_error(db_error("23514")), AppError::Database(_)));
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_foreign_key_violation_is_missing_book() {
        let err = map_copy_insert_error(db_error("23503"), 7);
        assert!(matches!(err, AppError::BookNotFound(7)));
    }

    #[test]
    fn test_unique_violation_on_copy_insert_stays_database() {
        let err = map_copy_insert_error(db_error("23505"), 7);
        assert!(matches!(err, AppError::Database(_)));
    }
}
