//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{present, Book, BookDetail, BookSummary, CreateBook, NewBook, UpdateBook},
        copy::CopySummary,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books, without their copies
    pub async fn list_books(&self) -> AppResult<Vec<BookSummary>> {
        let books = self.repository.books.find_all().await?;
        Ok(books.into_iter().map(BookSummary::from).collect())
    }

    /// Create a new book. Title and ISBN must both be unused.
    pub async fn create_book(&self, data: &CreateBook) -> AppResult<BookSummary> {
        let new_book = NewBook::try_from(data)?;

        if self.repository.books.exists_by_isbn(&data.isbn).await?
            || self.repository.books.exists_by_title(&data.title).await?
        {
            return Err(AppError::duplicate_book());
        }

        // The store re-checks uniqueness atomically for concurrent creates
        let book = self.repository.books.create(&new_book).await?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created");
        Ok(book.into())
    }

    /// Get a book with all of its copies
    pub async fn get_book_details(&self, id: i64) -> AppResult<BookDetail> {
        let book = self.find_book(id).await?;
        let copies = self.repository.copies.find_by_book_id(id).await?;
        Ok(BookDetail::new(
            book,
            copies.into_iter().map(CopySummary::from).collect(),
        ))
    }

    /// Update the supplied fields of a book.
    ///
    /// Changing the title or ISBN to a value held by another book fails with
    /// `DuplicateBook`.
    pub async fn update_book(&self, id: i64, data: &UpdateBook) -> AppResult<BookSummary> {
        let mut book = self.find_book(id).await?;

        if let Some(title) = present(&data.title) {
            if title != book.title && self.repository.books.exists_by_title(title).await? {
                return Err(AppError::duplicate_book());
            }
        }
        if let Some(isbn) = present(&data.isbn) {
            if isbn != book.isbn && self.repository.books.exists_by_isbn(isbn).await? {
                return Err(AppError::duplicate_book());
            }
        }

        if !data.apply_to(&mut book) {
            return Ok(book.into());
        }

        let updated = self.repository.books.update(&book).await?;
        tracing::info!(book_id = id, "Book updated");
        Ok(updated.into())
    }

    /// Delete a book and all of its copies
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.ensure_book_exists(id).await?;
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    /// List the copies of a book in creation order
    pub async fn list_copies(&self, book_id: i64) -> AppResult<Vec<CopySummary>> {
        self.ensure_book_exists(book_id).await?;
        let copies = self.repository.copies.find_by_book_id(book_id).await?;
        Ok(copies.into_iter().map(CopySummary::from).collect())
    }

    /// Add a new, available copy to a book
    pub async fn add_copy(&self, book_id: i64) -> AppResult<CopySummary> {
        self.ensure_book_exists(book_id).await?;
        let copy = self.repository.copies.create(book_id, true).await?;
        tracing::info!(book_id, copy_id = copy.id, "Copy added");
        Ok(copy.into())
    }

    /// Set the availability flag of a copy.
    ///
    /// The copy is looked up first; a copy that exists under another book yields
    /// `CopyBookMismatch` rather than `CopyNotFound`.
    pub async fn set_copy_availability(
        &self,
        book_id: i64,
        copy_id: i64,
        available: bool,
    ) -> AppResult<CopySummary> {
        let mut copy = self
            .repository
            .copies
            .find_by_id(copy_id)
            .await?
            .ok_or(AppError::CopyNotFound(copy_id))?;

        if copy.book_id != book_id {
            return Err(AppError::CopyBookMismatch { book_id, copy_id });
        }

        copy.available = available;
        let updated = self.repository.copies.update(&copy).await?;
        tracing::info!(book_id, copy_id, available, "Copy availability changed");
        Ok(updated.into())
    }

    async fn find_book(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    async fn ensure_book_exists(&self, id: i64) -> AppResult<()> {
        if !self.repository.books.exists_by_id(id).await? {
            return Err(AppError::BookNotFound(id));
        }
        Ok(())
    }
}
