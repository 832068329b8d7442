//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{map_write_error, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str = "id, title, author, isbn, published_year";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn exists_by_isbn(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn exists_by_title(&self, title: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE title = $1)")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create(&self, data: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, published_year)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(data.published_year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, published_year = $4
            WHERE id = $5
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.published_year)
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(AppError::BookNotFound(book.id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        // book_copies.book_id is declared ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::BookNotFound(id));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
