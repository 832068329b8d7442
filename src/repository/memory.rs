//! In-memory catalog engine.
//!
//! Both collections live behind a single lock so that uniqueness checks and the
//! book-to-copies cascade are applied atomically, the same guarantees the Postgres
//! schema gives through its unique indexes and `ON DELETE CASCADE`.
//!
//! State is lost when the process exits.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{BookStore, CopyStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, NewBook},
        copy::Copy,
    },
};

#[derive(Debug, Default)]
struct CatalogState {
    books: BTreeMap<i64, Book>,
    copies: BTreeMap<i64, Copy>,
    last_book_id: i64,
    last_copy_id: i64,
}

impl CatalogState {
    /// True if a book other than `except` already holds this title or ISBN
    fn conflicts(&self, title: &str, isbn: &str, except: Option<i64>) -> bool {
        self.books
            .values()
            .filter(|b| Some(b.id) != except)
            .any(|b| b.title == title || b.isbn == isbn)
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: RwLock<CatalogState>,
}

fn poison_err<T>(_: PoisonError<T>) -> AppError {
    AppError::Internal("catalog lock poisoned".to_string())
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryCatalog {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.values().cloned().collect())
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.values().any(|b| b.isbn == isbn))
    }

    async fn exists_by_title(&self, title: &str) -> AppResult<bool> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.values().any(|b| b.title == title))
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.contains_key(&id))
    }

    async fn create(&self, data: &NewBook) -> AppResult<Book> {
        let mut state = self.state.write().map_err(poison_err)?;
        if state.conflicts(&data.title, &data.isbn, None) {
            return Err(AppError::duplicate_book());
        }

        state.last_book_id += 1;
        let book = Book {
            id: state.last_book_id,
            title: data.title.clone(),
            author: data.author.clone(),
            isbn: data.isbn.clone(),
            published_year: data.published_year,
        };
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        let mut state = self.state.write().map_err(poison_err)?;
        if !state.books.contains_key(&book.id) {
            return Err(AppError::BookNotFound(book.id));
        }
        if state.conflicts(&book.title, &book.isbn, Some(book.id)) {
            return Err(AppError::duplicate_book());
        }

        state.books.insert(book.id, book.clone());
        Ok(book.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.write().map_err(poison_err)?;
        if state.books.remove(&id).is_none() {
            return Err(AppError::BookNotFound(id));
        }
        state.copies.retain(|_, copy| copy.book_id != id);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.books.len() as i64)
    }
}

#[async_trait]
impl CopyStore for MemoryCatalog {
    async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<Copy>> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state
            .copies
            .values()
            .filter(|c| c.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Copy>> {
        let state = self.state.read().map_err(poison_err)?;
        Ok(state.copies.get(&id).cloned())
    }

    async fn create(&self, book_id: i64, available: bool) -> AppResult<Copy> {
        let mut state = self.state.write().map_err(poison_err)?;
        if !state.books.contains_key(&book_id) {
            return Err(AppError::BookNotFound(book_id));
        }

        state.last_copy_id += 1;
        let copy = Copy {
            id: state.last_copy_id,
            book_id,
            available,
        };
        state.copies.insert(copy.id, copy.clone());
        Ok(copy)
    }

    async fn update(&self, copy: &Copy) -> AppResult<Copy> {
        let mut state = self.state.write().map_err(poison_err)?;
        let stored = state
            .copies
            .get_mut(&copy.id)
            .ok_or(AppError::CopyNotFound(copy.id))?;
        // Ownership never changes after creation
        stored.available = copy.available;
        Ok(stored.clone())
    }
}
